//! Seeded region growing

pub mod config;
pub mod window;
pub mod grower;

pub use config::{Connectivity, GrowConfig, GrowMode};
pub use window::AdmissionWindow;
pub use grower::{GrowResult, RegionGrower};
