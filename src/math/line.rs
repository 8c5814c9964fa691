//! Integer line rasterization within an axis-aligned slice.

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Normal axis of the slice a line is drawn in.
///
/// A `ZAxis` slice is the XY plane, `YAxis` the XZ plane and `XAxis` the YZ
/// plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOrientation {
    XAxis,
    YAxis,
    #[default]
    ZAxis,
}

impl SliceOrientation {
    /// The two axes (0 = X, 1 = Y, 2 = Z) that vary within the slice.
    pub fn plane_axes(self) -> (usize, usize) {
        match self {
            SliceOrientation::XAxis => (1, 2),
            SliceOrientation::YAxis => (0, 2),
            SliceOrientation::ZAxis => (0, 1),
        }
    }

    /// The axis held constant within the slice.
    pub fn normal_axis(self) -> usize {
        match self {
            SliceOrientation::XAxis => 0,
            SliceOrientation::YAxis => 1,
            SliceOrientation::ZAxis => 2,
        }
    }
}

/// Rasterize the line from `start` to `end` (both inclusive) with Bresenham
/// stepping on the slice's two in-plane axes.
///
/// The normal axis never changes: every point carries `start`'s value on it,
/// even when `end` disagrees. Stepping always runs from the endpoint that is
/// smaller on the in-plane axes, so swapping `start` and `end` yields the
/// same voxels in reverse order.
pub fn draw_line(orientation: SliceOrientation, start: IVec3, end: IVec3) -> Vec<IVec3> {
    let (d0, d1) = orientation.plane_axes();
    let a = (start[d0], start[d1]);
    let b = (end[d0], end[d1]);

    let swapped = b < a;
    let (from, to) = if swapped { (b, a) } else { (a, b) };

    let mut points: Vec<IVec3> = bresenham(from, to)
        .into_iter()
        .map(|(u, v)| {
            let mut p = start;
            p[d0] = u;
            p[d1] = v;
            p
        })
        .collect();
    if swapped {
        points.reverse();
    }
    points
}

/// Integer Bresenham in 2D. Arithmetic runs in i64 so endpoints anywhere in
/// the i32 range cannot overflow.
fn bresenham(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (x1, y1) = (i64::from(to.0), i64::from(to.1));
    let (mut x, mut y) = (i64::from(from.0), i64::from(from.1));

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };

    let mut points = Vec::with_capacity(dx.max(dy) as usize + 1);
    let mut err = dx - dy;
    loop {
        // Every point lies between the endpoints, so it fits back in i32
        points.push((x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    points
}
