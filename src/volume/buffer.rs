//! Dense volumetric image storage.

use glam::{IVec3, Vec3};

use crate::core::{Error, Result};
use super::index::{Dims, VoxelIndex};
use super::scalar::VoxelScalar;

/// Byte-level access to a volumetric image.
///
/// This is the whole contract the editing engine needs from an image: its
/// layout, and single-voxel reads and writes of `element_size` bytes.
pub trait VoxelBuffer {
    fn dims(&self) -> Dims;

    /// Physical size of one voxel along X, Y and Z (millimetres).
    fn spacing(&self) -> Vec3;

    /// Bytes per voxel.
    fn element_size(&self) -> usize;

    fn voxel_bytes(&self, index: VoxelIndex) -> &[u8];

    /// Overwrite one voxel. `value` must be exactly `element_size` bytes.
    fn set_voxel_bytes(&mut self, index: VoxelIndex, value: &[u8]);

    /// True when the voxel holds the all-zero value.
    fn is_null(&self, index: VoxelIndex) -> bool {
        self.voxel_bytes(index).iter().all(|&b| b == 0)
    }
}

/// Dense row-major volume of `T` voxels.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T: VoxelScalar> {
    dims: Dims,
    spacing: Vec3,
    data: Vec<T>,
}

impl<T: VoxelScalar> Volume<T> {
    /// Create a volume filled with the null value.
    pub fn new(dims: Dims, spacing: Vec3) -> Self {
        Self::filled(dims, spacing, T::default())
    }

    /// Create a volume with every voxel set to `value`.
    pub fn filled(dims: Dims, spacing: Vec3, value: T) -> Self {
        if spacing.cmple(Vec3::ZERO).any() {
            log::warn!("Volume {} created with non-positive spacing {}", dims, spacing);
        }
        Self {
            dims,
            spacing,
            data: vec![value; dims.len()],
        }
    }

    /// Wrap existing voxel data.
    pub fn from_vec(dims: Dims, spacing: Vec3, data: Vec<T>) -> Result<Self> {
        if data.len() != dims.len() {
            return Err(Error::Volume(format!(
                "{} voxels supplied for a {} volume ({} expected)",
                data.len(),
                dims,
                dims.len()
            )));
        }
        Ok(Self { dims, spacing, data })
    }

    /// Decode raw voxel bytes in native byte order.
    pub fn from_raw_bytes(dims: Dims, spacing: Vec3, bytes: &[u8]) -> Result<Self> {
        let expected = dims.len() * size_of::<T>();
        if bytes.len() != expected {
            return Err(Error::Volume(format!(
                "{} bytes supplied for a {} volume of {:?} ({} expected)",
                bytes.len(),
                dims,
                T::KIND,
                expected
            )));
        }
        // Input may be unaligned for T
        let data = bytes
            .chunks_exact(size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect();
        Self::from_vec(dims, spacing, data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, index: VoxelIndex) -> T {
        self.data[index.get()]
    }

    pub fn set(&mut self, index: VoxelIndex, value: T) {
        self.data[index.get()] = value;
    }

    /// Value at a coordinate, `None` outside the volume.
    pub fn get_at(&self, coord: IVec3) -> Option<T> {
        self.dims.index_of(coord).map(|index| self.get(index))
    }

    /// Write at a coordinate. Returns false (and writes nothing) outside the volume.
    pub fn set_at(&mut self, coord: IVec3, value: T) -> bool {
        match self.dims.index_of(coord) {
            Some(index) => {
                self.set(index, value);
                true
            }
            None => false,
        }
    }

    /// Count voxels holding exactly `value`.
    pub fn count(&self, value: T) -> usize {
        self.data.iter().filter(|v| **v == value).count()
    }
}

impl<T: VoxelScalar> VoxelBuffer for Volume<T> {
    fn dims(&self) -> Dims {
        self.dims
    }

    fn spacing(&self) -> Vec3 {
        self.spacing
    }

    fn element_size(&self) -> usize {
        size_of::<T>()
    }

    fn voxel_bytes(&self, index: VoxelIndex) -> &[u8] {
        bytemuck::bytes_of(&self.data[index.get()])
    }

    fn set_voxel_bytes(&mut self, index: VoxelIndex, value: &[u8]) {
        self.data[index.get()] = bytemuck::pod_read_unaligned(value);
    }

    fn is_null(&self, index: VoxelIndex) -> bool {
        self.data[index.get()].is_null()
    }
}
