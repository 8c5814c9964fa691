//! Volumetric image storage and indexing

pub mod index;
pub mod scalar;
pub mod buffer;
pub mod shared;

pub use index::{Dims, VoxelIndex};
pub use scalar::{ScalarKind, VoxelScalar};
pub use buffer::{Volume, VoxelBuffer};
pub use shared::{SharedVolume, VolumeGuard};
