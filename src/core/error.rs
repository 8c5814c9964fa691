//! Error types for the voxel editing engine

use std::collections::TryReserveError;

use glam::IVec3;
use thiserror::Error;

use crate::volume::Dims;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("Voxel {coord} lies outside volume {dims}")]
    OutOfBounds { coord: IVec3, dims: Dims },

    #[error("Diff log error: {0}")]
    DiffFormat(String),

    #[error("Volume error: {0}")]
    Volume(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Volume lock poisoned")]
    LockPoisoned,
}
