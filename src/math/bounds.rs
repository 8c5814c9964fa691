//! Integer voxel bounding box

use glam::IVec3;

/// Inclusive axis-aligned box of voxel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl VoxelBounds {
    /// Create bounds from min and max corners (both inclusive)
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Bounds covering a single voxel
    pub fn from_point(point: IVec3) -> Self {
        Self { min: point, max: point }
    }

    /// Voxel count along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of voxels covered
    pub fn volume(&self) -> usize {
        let size = self.size();
        size.x as usize * size.y as usize * size.z as usize
    }

    /// Grow to include a voxel
    pub fn expand(&mut self, point: IVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged bounds containing both
    pub fn merged(&self, other: &VoxelBounds) -> VoxelBounds {
        VoxelBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
