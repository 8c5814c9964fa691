//! Undo/redo stack of diff logs.

use std::collections::VecDeque;

use crate::core::Result;
use crate::volume::VoxelBuffer;
use super::diff::DiffLog;

/// Default number of undoable steps kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 64;

/// Bounded undo/redo history for one image.
///
/// Each step is one [`DiffLog`]. Pushing a new step discards the redo
/// stack; once `max_depth` steps are stored the oldest one is dropped.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo: VecDeque<DiffLog>,
    redo: Vec<DiffLog>,
    max_depth: usize,
}

impl EditHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a finished edit. Empty logs are ignored and return false.
    pub fn push(&mut self, diff: DiffLog) -> bool {
        if diff.is_empty() {
            return false;
        }
        self.redo.clear();
        self.undo.push_back(diff);
        while self.undo.len() > self.max_depth {
            if let Some(dropped) = self.undo.pop_front() {
                log::debug!("History full, dropping oldest step ({} entries)", dropped.len());
            }
        }
        true
    }

    /// Fold `diff` into the most recent step, so that one undo reverts both.
    /// Starts a new step when the history is empty.
    pub fn merge_into_last(&mut self, diff: &DiffLog) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }
        match self.undo.back_mut() {
            Some(last) => {
                self.redo.clear();
                last.concat(diff)
            }
            None => {
                self.push(diff.clone());
                Ok(())
            }
        }
    }

    /// Revert the latest step on `image`. Returns false when there is nothing to undo.
    pub fn undo<B: VoxelBuffer + ?Sized>(&mut self, image: &mut B) -> bool {
        match self.undo.pop_back() {
            Some(diff) => {
                diff.revert(image);
                self.redo.push(diff);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone step. Returns false when there is nothing to redo.
    pub fn redo<B: VoxelBuffer + ?Sized>(&mut self, image: &mut B) -> bool {
        match self.redo.pop() {
            Some(diff) => {
                diff.apply(image);
                self.undo.push_back(diff);
                true
            }
            None => false,
        }
    }

    /// The step [`EditHistory::undo`] would revert next.
    pub fn peek_undo(&self) -> Option<&DiffLog> {
        self.undo.back()
    }

    /// The step [`EditHistory::redo`] would re-apply next.
    pub fn peek_redo(&self) -> Option<&DiffLog> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable steps.
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Bytes held by both stacks.
    pub fn byte_size(&self) -> usize {
        self.undo.iter().chain(self.redo.iter()).map(DiffLog::byte_size).sum()
    }

    /// Concatenate every undoable step, oldest first, into one log.
    /// `None` when nothing has been recorded.
    pub fn flatten(&self) -> Result<Option<DiffLog>> {
        let mut steps = self.undo.iter();
        let Some(first) = steps.next() else {
            return Ok(None);
        };
        let mut merged = first.clone();
        for step in steps {
            merged.concat(step)?;
        }
        Ok(Some(merged))
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
