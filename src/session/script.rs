//! JSON edit scripts.
//!
//! A script names the layout of a raw volume and the ordered list of edits
//! to run on it:
//!
//! ```json
//! {
//!   "volume": { "dims": [64, 64, 32], "spacing": [0.5, 0.5, 1.0], "scalar": "i16" },
//!   "commands": [
//!     { "op": "stroke", "start": [4, 4, 10], "end": [40, 20, 10], "value": 1, "thickness_mm": 2.0 },
//!     { "op": "grow", "seeds": [[30, 30, 10]], "value": 2, "mode": "minmax", "radius_mm": 12.0 },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use std::path::Path;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::brush::StrokeConfig;
use crate::core::Result;
use crate::region::GrowConfig;
use crate::volume::{Dims, ScalarKind};
use super::config::SessionConfig;

/// Layout of a raw volume file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeDesc {
    pub dims: [usize; 3],
    #[serde(default = "unit_spacing")]
    pub spacing: [f32; 3],
    pub scalar: ScalarKind,
}

fn unit_spacing() -> [f32; 3] {
    [1.0; 3]
}

impl VolumeDesc {
    pub fn dims(&self) -> Dims {
        Dims::from(self.dims)
    }

    pub fn spacing(&self) -> Vec3 {
        Vec3::from_array(self.spacing)
    }

    /// Expected size of the raw file in bytes.
    pub fn byte_len(&self) -> usize {
        self.dims().len() * self.scalar.size()
    }
}

/// One step of an edit script. Values are given as numbers and narrowed
/// (saturating) to the volume's scalar type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    Stroke {
        start: [i32; 3],
        end: [i32; 3],
        value: f64,
        #[serde(flatten)]
        config: StrokeConfig,
    },
    Grow {
        seeds: Vec<[i32; 3]>,
        value: f64,
        #[serde(flatten)]
        config: GrowConfig,
    },
    Undo,
    Redo,
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::Stroke { .. } => "stroke",
            EditCommand::Grow { .. } => "grow",
            EditCommand::Undo => "undo",
            EditCommand::Redo => "redo",
        }
    }
}

/// A volume layout plus the edits to run on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    pub volume: VolumeDesc,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub commands: Vec<EditCommand>,
}

impl EditScript {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub(crate) fn to_coord(coord: [i32; 3]) -> IVec3 {
    IVec3::from_array(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::SliceOrientation;
    use crate::region::GrowMode;

    const SCRIPT: &str = r#"{
        "volume": { "dims": [16, 8, 4], "spacing": [0.5, 0.5, 2.0], "scalar": "i16" },
        "session": { "history_depth": 8 },
        "commands": [
            { "op": "stroke", "start": [0, 0, 1], "end": [15, 7, 1], "value": 3, "thickness_mm": 1.5, "orientation": "z_axis" },
            { "op": "grow", "seeds": [[2, 2, 2], [3, 3, 2]], "value": -1, "mode": "stddev", "radius_mm": 4.0, "overwrite": false },
            { "op": "undo" },
            { "op": "redo" }
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script = EditScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.volume.dims(), Dims::new(16, 8, 4));
        assert_eq!(script.volume.scalar, ScalarKind::I16);
        assert_eq!(script.volume.byte_len(), 16 * 8 * 4 * 2);
        assert_eq!(script.session.history_depth, 8);
        assert_eq!(script.commands.len(), 4);

        match &script.commands[0] {
            EditCommand::Stroke { start, end, value, config } => {
                assert_eq!(*start, [0, 0, 1]);
                assert_eq!(*end, [15, 7, 1]);
                assert_eq!(*value, 3.0);
                assert_eq!(config.orientation, SliceOrientation::ZAxis);
                assert_eq!(config.thickness_mm, 1.5);
                assert!(config.overwrite);
            }
            other => panic!("expected stroke, got {}", other.name()),
        }
        match &script.commands[1] {
            EditCommand::Grow { seeds, value, config } => {
                assert_eq!(seeds.len(), 2);
                assert_eq!(*value, -1.0);
                assert_eq!(config.mode, GrowMode::StdDev);
                assert_eq!(config.radius_mm, Some(4.0));
                assert!(!config.overwrite);
            }
            other => panic!("expected grow, got {}", other.name()),
        }
        assert_eq!(script.commands[2], EditCommand::Undo);
        assert_eq!(script.commands[3], EditCommand::Redo);
    }

    #[test]
    fn test_defaults() {
        let script = EditScript::from_json(r#"{ "volume": { "dims": [2, 2, 2], "scalar": "u8" } }"#).unwrap();
        assert_eq!(script.volume.spacing(), Vec3::ONE);
        assert_eq!(script.session, SessionConfig::default());
        assert!(script.commands.is_empty());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let script = EditScript::from_json(SCRIPT).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, script.to_json().unwrap()).unwrap();
        assert_eq!(EditScript::load(&path).unwrap(), script);
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = EditScript::from_json(
            r#"{ "volume": { "dims": [1, 1, 1], "scalar": "u8" }, "commands": [{ "op": "erase" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, crate::core::Error::Json(_)));
    }
}
