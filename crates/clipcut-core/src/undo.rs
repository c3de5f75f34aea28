//! Snapshot-based undo history.
//!
//! The editor's in-memory state (segments, captions, effect zooms) is kept
//! as independent mappings keyed by `videoId`. Rather than a command/inverse
//! stack, undo here is a ring buffer of immutable snapshots of the whole
//! mapping: reverting replaces the current value wholesale. There are no
//! back-pointers between snapshots, so the history is safe to truncate or
//! drop at any point without leaving dangling references.

const DEFAULT_MAX_DEPTH: usize = 50;

/// Ring-buffer history of immutable snapshots of a `T`.
pub struct SnapshotHistory<T: Clone> {
    undo: Vec<T>,
    redo: Vec<T>,
    max_depth: usize,
}

impl<T: Clone> SnapshotHistory<T> {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record `previous` as a recoverable snapshot before applying a change.
    /// Clears the redo chain, matching the usual "new edit invalidates redo"
    /// rule.
    pub fn push(&mut self, previous: T) {
        self.undo.push(previous);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Pop the most recent snapshot, pushing `current` onto the redo side
    /// so it can be restored later. Returns the snapshot to revert to.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let snapshot = self.undo.pop()?;
        self.redo.push(current);
        Some(snapshot)
    }

    /// Pop the most recent redo snapshot, pushing `current` back onto undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let snapshot = self.redo.pop()?;
        self.undo.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

impl<T: Clone> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}
