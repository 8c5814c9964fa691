//! Scripted edit sessions over a single volume.

pub mod config;
pub mod script;
pub mod editor;

pub use config::SessionConfig;
pub use script::{EditCommand, EditScript, VolumeDesc};
pub use editor::EditSession;
