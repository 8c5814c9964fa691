//! Brush tools for painting voxels along slice strokes

pub mod config;
pub mod painter;

// Re-exports
pub use config::StrokeConfig;
pub use painter::StrokePainter;
