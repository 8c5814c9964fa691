//! Admissible value window derived from seed values.

use crate::volume::VoxelScalar;
use super::config::GrowMode;

/// Inclusive `[min, max]` range a voxel value must fall in to propagate.
///
/// Bounds are kept as f64 and clamped to the scalar type's range, so a
/// `mean ± sigma` window saturates at the type limits instead of wrapping,
/// and a fractional bound is compared exactly rather than truncated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdmissionWindow {
    pub min: f64,
    pub max: f64,
}

impl AdmissionWindow {
    /// Derive the window for `mode` from the seed values.
    /// Returns `None` without seeds.
    pub fn from_seeds<T: VoxelScalar>(mode: GrowMode, seeds: &[T]) -> Option<Self> {
        if seeds.is_empty() {
            return None;
        }

        let type_min = T::MIN.to_f64();
        let type_max = T::MAX.to_f64();
        let values = seeds.iter().map(|v| v.to_f64());
        let lowest = values.clone().fold(f64::INFINITY, f64::min);
        let highest = values.clone().fold(f64::NEG_INFINITY, f64::max);

        let (min, max) = match mode {
            GrowMode::Min => (lowest, type_max),
            GrowMode::Max => (type_min, highest),
            GrowMode::MinMax => (lowest, highest),
            GrowMode::StdDev => {
                let n = seeds.len() as f64;
                let mean = values.clone().sum::<f64>() / n;
                let variance = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
                let sigma = variance.sqrt();
                (mean - sigma, mean + sigma)
            }
        };

        Some(Self {
            min: min.max(type_min),
            max: max.min(type_max),
        })
    }

    /// Check if `value` lies inside the window. NaN never does.
    pub fn contains<T: VoxelScalar>(&self, value: T) -> bool {
        let v = value.to_f64();
        v >= self.min && v <= self.max
    }

    /// Window bounds narrowed to `T`.
    pub fn bounds<T: VoxelScalar>(&self) -> (T, T) {
        (T::from_f64(self.min), T::from_f64(self.max))
    }
}
