//! Voxedit - voxel painting, undo logs and seeded region growing
//!
//! Tools edit dense 3D scalar volumes and report every write as a
//! byte-level [`edit::DiffLog`] that the caller can undo, redo or persist.

pub mod core;
pub mod math;
pub mod volume;
pub mod edit;
pub mod brush;
pub mod region;
pub mod session;
