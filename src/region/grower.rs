//! Seeded region growing.
//!
//! Breadth-first flood fill from a set of seed voxels. A voxel joins the
//! region when its input value lies inside the admission window, its output
//! voxel may be written (overwrite, or currently null), it is inside the
//! ROI, and it is close enough to a seed. Only accepted voxels expand;
//! every voxel is examined at most once.

use std::collections::VecDeque;

use glam::{IVec3, Vec3};

use crate::core::{Error, Result};
use crate::edit::DiffLog;
use crate::volume::{Dims, Volume, VoxelBuffer, VoxelIndex, VoxelScalar};
use super::config::{Connectivity, GrowConfig, GrowMode};
use super::window::AdmissionWindow;

/// Everything a propagation produced.
#[derive(Debug, Clone)]
pub struct GrowResult {
    /// Changes in the input image's element size: `(index, input value,
    /// label)`. Applying it burns the label into the input image.
    pub diff: DiffLog,
    /// Changes made to the output image: `(index, previous output, label)`.
    pub display_diff: DiffLog,
    /// Voxels accepted into the region, including ones already labelled.
    pub accepted: usize,
    /// Voxels examined.
    pub visited: usize,
    /// Window derived from the seeds, `None` without seeds.
    pub window: Option<AdmissionWindow>,
}

/// Flood fill tool driven by a [`GrowConfig`].
#[derive(Debug, Clone, Default)]
pub struct RegionGrower {
    config: GrowConfig,
}

impl RegionGrower {
    /// Create a grower with default settings for `mode`.
    pub fn new(mode: GrowMode) -> Self {
        Self {
            config: GrowConfig {
                mode,
                ..GrowConfig::default()
            },
        }
    }

    pub fn from_config(config: GrowConfig) -> Self {
        Self { config }
    }

    /// Limit propagation to `radius_mm` around the seeds (builder pattern)
    pub fn with_radius(mut self, radius_mm: f32) -> Self {
        self.config.radius_mm = Some(radius_mm);
        self
    }

    /// Set overwrite policy (builder pattern)
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Set neighbourhood (builder pattern)
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.config.connectivity = connectivity;
        self
    }

    pub fn config(&self) -> &GrowConfig {
        &self.config
    }

    /// Grow a region labelled `value` into `output` and return the changes
    /// expressed against `input`.
    pub fn process<T: VoxelScalar, L: VoxelScalar>(
        &self,
        input: &Volume<T>,
        output: &mut Volume<L>,
        roi: Option<&dyn VoxelBuffer>,
        seeds: &[IVec3],
        value: L,
    ) -> Result<DiffLog> {
        Ok(self.process_detailed(input, output, roi, seeds, value)?.diff)
    }

    /// [`RegionGrower::process`] returning the output-side log and counters too.
    ///
    /// # Errors
    /// [`Error::OutOfBounds`] if a seed lies outside the image; nothing is
    /// written in that case.
    ///
    /// # Panics
    /// If `output` or `roi` do not share the input grid.
    pub fn process_detailed<T: VoxelScalar, L: VoxelScalar>(
        &self,
        input: &Volume<T>,
        output: &mut Volume<L>,
        roi: Option<&dyn VoxelBuffer>,
        seeds: &[IVec3],
        value: L,
    ) -> Result<GrowResult> {
        let dims = input.dims();
        assert_eq!(output.dims(), dims, "output must share the input grid");
        if let Some(roi) = roi {
            assert_eq!(roi.dims(), dims, "ROI must share the input grid");
        }

        let seed_indices = seeds
            .iter()
            .map(|&coord| dims.index_of(coord).ok_or_else(|| Error::OutOfBounds { coord, dims }))
            .collect::<Result<Vec<_>>>()?;
        let seed_values: Vec<T> = seed_indices.iter().map(|&index| input.get(index)).collect();

        let mut result = GrowResult {
            diff: DiffLog::for_scalar::<T>(0),
            display_diff: DiffLog::for_scalar::<L>(0),
            accepted: 0,
            visited: 0,
            window: AdmissionWindow::from_seeds(self.config.mode, &seed_values),
        };
        let Some(window) = result.window else {
            log::debug!("Region grow called without seeds");
            return Ok(result);
        };

        let spacing = input.spacing();
        let radius_sq = self.active_radius_sq(dims, spacing);
        let input_value = T::from_f64(value.to_f64());
        let offsets = self.config.connectivity.offsets();

        let admits = |coord: IVec3, index: VoxelIndex, output: &Volume<L>| -> bool {
            if !window.contains(input.get(index)) {
                return false;
            }
            if !self.config.overwrite && !output.get(index).is_null() {
                return false;
            }
            if let Some(roi) = roi {
                if roi.is_null(index) {
                    return false;
                }
            }
            match radius_sq {
                Some(r2) => seeds.iter().any(|&seed| distance_sq(coord, seed, spacing) <= r2),
                None => true,
            }
        };

        for (coord, seed_value) in seeds.iter().zip(&seed_values) {
            if !window.contains(*seed_value) {
                log::trace!("Seed {} value {:?} outside window [{}, {}]", coord, seed_value, window.min, window.max);
            }
        }

        let mut visited = vec![false; dims.len()];
        let mut queue = VecDeque::with_capacity(seeds.len());
        for (&coord, &index) in seeds.iter().zip(&seed_indices) {
            if !visited[index.get()] {
                visited[index.get()] = true;
                queue.push_back((coord, index));
            }
        }

        while let Some((coord, index)) = queue.pop_front() {
            result.visited += 1;
            if !admits(coord, index, output) {
                continue;
            }
            result.accepted += 1;

            // Already-labelled voxels are not logged but still expand
            let previous = output.get(index);
            if previous != value {
                result.display_diff.record_value(index, &previous, &value)?;
                result.diff.record_value(index, &input.get(index), &input_value)?;
                output.set(index, value);
            }

            for offset in &offsets {
                let neighbour = coord + *offset;
                let Some(next) = dims.index_of(neighbour) else {
                    continue;
                };
                if !visited[next.get()] {
                    visited[next.get()] = true;
                    queue.push_back((neighbour, next));
                }
            }
        }

        let (low, high) = window.bounds::<T>();
        log::debug!(
            "Region grow from {} seeds ({:?}, window {:?}..={:?}): {} visited, {} accepted, {} changed",
            seeds.len(),
            self.config.mode,
            low,
            high,
            result.visited,
            result.accepted,
            result.diff.len()
        );
        Ok(result)
    }

    /// Squared radius when the radius limit matters for this image.
    /// A radius beyond the image diagonal cannot exclude anything.
    fn active_radius_sq(&self, dims: Dims, spacing: Vec3) -> Option<f32> {
        let radius = self.config.radius_mm.filter(|r| r.is_finite())?;
        let radius_sq = radius * radius;
        let diagonal_sq = dims.physical_extent(spacing).length_squared();
        (radius_sq <= diagonal_sq).then_some(radius_sq)
    }
}

/// Squared spacing-weighted distance between two voxels.
fn distance_sq(a: IVec3, b: IVec3, spacing: Vec3) -> f32 {
    ((a - b).as_vec3() * spacing).length_squared()
}
