//! Edit session configuration.

use serde::{Deserialize, Serialize};

use crate::edit::DEFAULT_HISTORY_DEPTH;

/// Settings for an [`EditSession`](super::EditSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of undoable steps kept.
    pub history_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl SessionConfig {
    /// Set history depth (builder pattern)
    pub fn with_history_depth(mut self, history_depth: usize) -> Self {
        self.history_depth = history_depth;
        self
    }
}
