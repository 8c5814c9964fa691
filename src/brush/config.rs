//! Stroke painting configuration.

use serde::{Deserialize, Serialize};

use crate::math::SliceOrientation;

/// Settings shared by the strokes of one painting tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Slice the stroke is drawn in.
    pub orientation: SliceOrientation,
    /// Brush diameter in millimetres.
    pub thickness_mm: f32,
    /// Paint over non-null voxels. When false only null voxels are filled.
    pub overwrite: bool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            orientation: SliceOrientation::ZAxis,
            thickness_mm: 1.0,
            overwrite: true,
        }
    }
}

impl StrokeConfig {
    /// Create a config for the given slice with default brush settings.
    pub fn new(orientation: SliceOrientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    /// Set brush thickness (builder pattern)
    pub fn with_thickness(mut self, thickness_mm: f32) -> Self {
        self.thickness_mm = thickness_mm;
        self
    }

    /// Set overwrite policy (builder pattern)
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = StrokeConfig::default();
        assert_eq!(cfg.orientation, SliceOrientation::ZAxis);
        assert!(cfg.overwrite);
        assert!(cfg.thickness_mm > 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: StrokeConfig = serde_json::from_str(r#"{"orientation": "x_axis"}"#).unwrap();
        assert_eq!(cfg, StrokeConfig::new(SliceOrientation::XAxis));
    }
}
