//! Thick line strokes stamped into a volume.
//!
//! A stroke is the Bresenham path between two voxels with a filled
//! ellipse stamped at every path point. The ellipse lies in the slice
//! plane; its per-axis voxel radii follow the image spacing, so a round
//! brush stays round in millimetres on anisotropic images.

use std::ops::RangeInclusive;

use glam::{IVec3, Vec3};

use crate::core::Result;
use crate::edit::DiffLog;
use crate::math::{draw_line, SliceOrientation};
use crate::volume::{Dims, Volume, VoxelBuffer, VoxelIndex, VoxelScalar};
use super::config::StrokeConfig;

/// Paints strokes into one image, optionally confined to an ROI mask.
pub struct StrokePainter<'a, T: VoxelScalar> {
    image: &'a mut Volume<T>,
    roi: Option<&'a dyn VoxelBuffer>,
    dims: Dims,
    spacing: Vec3,
}

impl<'a, T: VoxelScalar> StrokePainter<'a, T> {
    /// Create a painter for `image`. Voxels where `roi` is null are never
    /// painted.
    ///
    /// # Panics
    /// If the ROI grid differs from the image grid.
    pub fn new(image: &'a mut Volume<T>, roi: Option<&'a dyn VoxelBuffer>) -> Self {
        let dims = image.dims();
        if let Some(roi) = roi {
            assert_eq!(roi.dims(), dims, "ROI must share the image grid");
        }
        Self {
            dims,
            spacing: image.spacing(),
            image,
            roi,
        }
    }

    pub fn use_roi(&self) -> bool {
        self.roi.is_some()
    }

    /// Paint a stroke from `start` to `end` and return the changes.
    ///
    /// `thickness_mm` is the brush diameter. Coordinates outside the image
    /// are clipped. The caller owns the returned log (push it on an undo
    /// history, notify views).
    pub fn draw(
        &mut self,
        orientation: SliceOrientation,
        start: IVec3,
        end: IVec3,
        value: T,
        thickness_mm: f32,
        overwrite: bool,
    ) -> Result<DiffLog> {
        let path = draw_line(orientation, start, end);
        let (first_dim, second_dim) = orientation.plane_axes();
        let radius_mm = thickness_mm * 0.5;

        let mut diff = DiffLog::for_scalar::<T>(path.len());
        let mut changed = false;
        for &point in &path {
            changed |= self.draw_ellipse(point, value, radius_mm, first_dim, second_dim, overwrite, &mut diff)?;
        }

        if changed {
            log::debug!(
                "Stroke {} -> {} ({:?}, {} points): {} voxels changed",
                start, end, orientation, path.len(), diff.len()
            );
        } else {
            log::debug!("Stroke {} -> {} changed nothing", start, end);
        }
        Ok(diff)
    }

    /// [`StrokePainter::draw`] with settings taken from a [`StrokeConfig`].
    pub fn draw_with(&mut self, config: &StrokeConfig, start: IVec3, end: IVec3, value: T) -> Result<DiffLog> {
        self.draw(config.orientation, start, end, value, config.thickness_mm, config.overwrite)
    }

    /// Stamp a filled ellipse of `radius_mm` around `center` on the
    /// `first_dim`/`second_dim` plane. Returns true if any voxel was written.
    #[allow(clippy::too_many_arguments)]
    fn draw_ellipse(
        &mut self,
        center: IVec3,
        value: T,
        radius_mm: f32,
        first_dim: usize,
        second_dim: usize,
        overwrite: bool,
        diff: &mut DiffLog,
    ) -> Result<bool> {
        let rx = voxel_radius(radius_mm, self.spacing[first_dim]);
        let ry = voxel_radius(radius_mm, self.spacing[second_dim]);
        let i_range = self.clipped_offsets(center, first_dim, rx);
        let j_range = self.clipped_offsets(center, second_dim, ry);

        let mut wrote = false;
        for j in j_range {
            // |j| <= floor(ry) so ry >= 1 whenever j != 0
            let v = if j == 0 { 0.0 } else { j as f32 / ry };
            for i in i_range.clone() {
                let u = if i == 0 { 0.0 } else { i as f32 / rx };
                if u * u + v * v > 1.0 {
                    continue;
                }

                // Clipped offsets keep both components inside the image
                let mut coord = center;
                coord[first_dim] = (i64::from(center[first_dim]) + i) as i32;
                coord[second_dim] = (i64::from(center[second_dim]) + j) as i32;
                let Some(index) = self.dims.index_of(coord) else {
                    continue;
                };
                wrote |= self.draw_pixel(index, value, overwrite, diff)?;
            }
        }
        Ok(wrote)
    }

    /// Offsets within `radius` voxels of `center` along `axis` that land
    /// inside the image. Empty when the brush misses the image entirely.
    fn clipped_offsets(&self, center: IVec3, axis: usize, radius: f32) -> RangeInclusive<i64> {
        let reach = radius.floor() as i64;
        let c = i64::from(center[axis]);
        let len = self.dims.axis_len(axis) as i64;
        (-reach).max(-c)..=reach.min(len - 1 - c)
    }

    /// Write one voxel if admitted. A voxel already holding `value` is a
    /// no-op and is not logged.
    fn draw_pixel(&mut self, index: VoxelIndex, value: T, overwrite: bool, diff: &mut DiffLog) -> Result<bool> {
        if let Some(roi) = self.roi {
            if roi.is_null(index) {
                return Ok(false);
            }
        }

        let current = self.image.get(index);
        if !overwrite && !current.is_null() {
            return Ok(false);
        }
        if current == value {
            return Ok(false);
        }

        diff.record_value(index, &current, &value)?;
        self.image.set(index, value);
        Ok(true)
    }
}

/// Millimetre radius to voxel radius along an axis.
fn voxel_radius(radius_mm: f32, spacing: f32) -> f32 {
    if spacing > 0.0 && radius_mm > 0.0 {
        radius_mm / spacing
    } else {
        0.0
    }
}
