//! Discrete geometry helpers

pub mod bounds;
pub mod line;

pub use bounds::VoxelBounds;
pub use line::{draw_line, SliceOrientation};
