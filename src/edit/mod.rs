//! Voxel edit recording with byte-level diff logs.
//!
//! Every write made by the painting and region-growing tools is captured
//! as an old/new pair, enabling undo/redo and optional persistence.

pub mod diff;
pub mod history;

pub use diff::{DiffEntry, DiffLog};
pub use history::{EditHistory, DEFAULT_HISTORY_DEPTH};
