//! Region growing configuration.

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// How the admissible value window is derived from the seed values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowMode {
    /// `[min(seeds), type max]`
    Min,
    /// `[type min, max(seeds)]`
    Max,
    /// `[min(seeds), max(seeds)]`
    #[default]
    MinMax,
    /// `[mean - sigma, mean + sigma]` over the seed values
    StdDev,
}

/// Which neighbours a voxel propagates to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Face neighbours
    #[default]
    Six,
    /// Face, edge and corner neighbours
    TwentySix,
}

impl Connectivity {
    /// Neighbour offsets, in a fixed order.
    pub fn offsets(self) -> Vec<IVec3> {
        match self {
            Connectivity::Six => vec![
                IVec3::NEG_X, IVec3::X,
                IVec3::NEG_Y, IVec3::Y,
                IVec3::NEG_Z, IVec3::Z,
            ],
            Connectivity::TwentySix => (-1..=1)
                .flat_map(|z| (-1..=1).flat_map(move |y| (-1..=1).map(move |x| IVec3::new(x, y, z))))
                .filter(|offset| *offset != IVec3::ZERO)
                .collect(),
        }
    }
}

/// Settings for one region growing tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowConfig {
    pub mode: GrowMode,
    /// Maximum spacing-weighted distance from the nearest seed, in
    /// millimetres. `None`, or a radius beyond the image diagonal, means
    /// no limit.
    pub radius_mm: Option<f32>,
    /// Relabel voxels whose output value is already non-null.
    pub overwrite: bool,
    pub connectivity: Connectivity,
}

impl Default for GrowConfig {
    fn default() -> Self {
        Self {
            mode: GrowMode::MinMax,
            radius_mm: None,
            overwrite: true,
            connectivity: Connectivity::Six,
        }
    }
}
