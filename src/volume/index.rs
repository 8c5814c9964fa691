//! Flattened voxel indexing.
//!
//! Every component addresses voxels through a [`VoxelIndex`] into a dense,
//! row-major buffer: `index = x + y * width + z * width * height`. The
//! conversions between 3D coordinates and that flat form live here and
//! nowhere else, so bounds are checked in one place.

use std::fmt;

use glam::{IVec3, Vec3};

/// Position of one voxel in a flattened row-major buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoxelIndex(usize);

impl VoxelIndex {
    /// Wrap a raw flat offset.
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw flat offset.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for VoxelIndex {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Voxel counts of a volume along X, Y and Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Dims {
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self { width, height, depth }
    }

    /// Total number of voxels.
    pub const fn len(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stride between two consecutive rows.
    pub const fn y_pitch(&self) -> usize {
        self.width
    }

    /// Stride between two consecutive slices.
    pub const fn z_pitch(&self) -> usize {
        self.width * self.height
    }

    /// Voxel count along `axis` (0 = X, 1 = Y, 2 = Z).
    pub fn axis_len(&self, axis: usize) -> usize {
        match axis {
            0 => self.width,
            1 => self.height,
            2 => self.depth,
            _ => panic!("axis {axis} out of range"),
        }
    }

    /// Check if a coordinate lies inside the volume
    pub fn contains(&self, coord: IVec3) -> bool {
        coord.x >= 0 && (coord.x as usize) < self.width
            && coord.y >= 0 && (coord.y as usize) < self.height
            && coord.z >= 0 && (coord.z as usize) < self.depth
    }

    /// Flatten a coordinate, or `None` when it falls outside the volume.
    pub fn index_of(&self, coord: IVec3) -> Option<VoxelIndex> {
        if !self.contains(coord) {
            return None;
        }
        Some(VoxelIndex(
            coord.x as usize + coord.y as usize * self.y_pitch() + coord.z as usize * self.z_pitch(),
        ))
    }

    /// Inverse of [`Dims::index_of`].
    pub fn coord_of(&self, index: VoxelIndex) -> IVec3 {
        debug_assert!(index.0 < self.len(), "{index} outside {self}");
        let i = index.0;
        IVec3::new(
            (i % self.width) as i32,
            ((i / self.y_pitch()) % self.height) as i32,
            (i / self.z_pitch()) as i32,
        )
    }

    /// Physical size of the volume given a per-axis voxel spacing.
    pub fn physical_extent(&self, spacing: Vec3) -> Vec3 {
        Vec3::new(self.width as f32, self.height as f32, self.depth as f32) * spacing
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

impl From<[usize; 3]> for Dims {
    fn from([width, height, depth]: [usize; 3]) -> Self {
        Self { width, height, depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let dims = Dims::new(4, 3, 2);
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..4 {
                    let coord = IVec3::new(x, y, z);
                    let index = dims.index_of(coord).unwrap();
                    assert_eq!(index.get(), (x + y * 4 + z * 12) as usize);
                    assert_eq!(dims.coord_of(index), coord);
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let dims = Dims::new(4, 3, 2);
        assert!(dims.index_of(IVec3::new(-1, 0, 0)).is_none());
        assert!(dims.index_of(IVec3::new(4, 0, 0)).is_none());
        assert!(dims.index_of(IVec3::new(0, 3, 0)).is_none());
        assert!(dims.index_of(IVec3::new(0, 0, 2)).is_none());
    }

    #[test]
    fn test_pitches_and_extent() {
        let dims = Dims::new(5, 6, 7);
        assert_eq!(dims.y_pitch(), 5);
        assert_eq!(dims.z_pitch(), 30);
        assert_eq!(dims.len(), 210);
        let extent = dims.physical_extent(Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(extent, Vec3::new(2.5, 6.0, 14.0));
        assert_eq!(dims.to_string(), "5x6x7");
    }
}
