//! Linear undo/redo history over document snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::{reducer, Command, EditorConfig, Snapshot};

/// The current snapshot plus the checkpoints around it.
///
/// `past` runs oldest to newest; `future` holds undone snapshots with the next
/// redo last. Only the transition function produces new histories, so every
/// snapshot reachable from here is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    past: VecDeque<Arc<Snapshot>>,
    present: Arc<Snapshot>,
    future: Vec<Arc<Snapshot>>,
    /// Maximum length of `past`. Oldest checkpoints are evicted first.
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default retention limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    /// Create an empty history configured for a session.
    #[must_use]
    pub fn with_config(config: &EditorConfig) -> Self {
        Self::from_snapshot(Snapshot::new()).with_limit(config.history_limit)
    }

    /// Start a history at an existing (normalized) snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            past: VecDeque::new(),
            present: Arc::new(snapshot.normalized()),
            future: Vec::new(),
            limit: EditorConfig::default().history_limit,
        }
    }

    /// Change the retention limit, evicting old checkpoints if needed.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.evict();
        self
    }

    /// Apply a command. See [`reducer::reduce`].
    #[must_use]
    pub fn apply(self, command: Command) -> Self {
        reducer::reduce(self, command)
    }

    /// The current snapshot.
    #[must_use]
    pub fn present(&self) -> &Snapshot {
        &self.present
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn present_handle(&self) -> Arc<Snapshot> {
        Arc::clone(&self.present)
    }

    /// Undo checkpoints, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &Snapshot> {
        self.past.iter().map(AsRef::as_ref)
    }

    /// Redo checkpoints, next redo first.
    pub fn future(&self) -> impl Iterator<Item = &Snapshot> {
        self.future.iter().rev().map(AsRef::as_ref)
    }

    /// Number of undo checkpoints.
    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo checkpoints.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// The retention limit.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    // -----------------------------------------------------------------------
    // Transitions, driven by the reducer
    // -----------------------------------------------------------------------

    /// Record `next` as a new checkpoint after the present one.
    pub(crate) fn commit(mut self, next: Snapshot) -> Self {
        let previous = std::mem::replace(&mut self.present, Arc::new(next));
        self.past.push_back(previous);
        self.future.clear();
        self.evict();
        self
    }

    /// Replace the present snapshot without recording a checkpoint.
    pub(crate) fn replace_present(mut self, next: Snapshot) -> Self {
        self.present = Arc::new(next);
        self
    }

    pub(crate) fn undo(mut self) -> Self {
        let Some(previous) = self.past.pop_back() else {
            return self;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        self
    }

    pub(crate) fn redo(mut self) -> Self {
        let Some(next) = self.future.pop() else {
            return self;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.evict();
        self
    }

    /// Drop all checkpoints and start over at `snapshot`.
    pub(crate) fn restart(self, snapshot: Snapshot) -> Self {
        Self::from_snapshot(snapshot).with_limit(self.limit)
    }

    fn evict(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        let excess = self.past.len().saturating_sub(limit);
        if excess > 0 {
            self.past.drain(..excess);
            tracing::trace!("Evicted {excess} undo checkpoints");
        }
    }
}
