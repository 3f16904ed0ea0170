//! Linear snapshot history for undo/redo.
//!
//! Every committed state is stored whole. A commit after an undo discards the
//! redo tail; there is no branching.

use crate::types::GridState;

/// One committed state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    pub state: GridState,
}

/// Snapshot list plus a cursor at the current state.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    max_depth: Option<usize>,
}

impl History {
    /// Unbounded history seeded with `initial`.
    pub fn new(initial: GridState, timestamp_ms: u64) -> Self {
        Self {
            entries: vec![HistoryEntry {
                timestamp_ms,
                state: initial,
            }],
            cursor: 0,
            max_depth: None,
        }
    }

    /// History keeping at most `max_depth` entries (at least 1); the oldest are dropped.
    pub fn with_depth(initial: GridState, timestamp_ms: u64, max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth.max(1)),
            ..Self::new(initial, timestamp_ms)
        }
    }

    /// Append `state` after the cursor, discarding any redo tail.
    pub fn record(&mut self, state: GridState, timestamp_ms: u64) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            timestamp_ms,
            state,
        });
        self.cursor = self.entries.len() - 1;

        // Trim if exceeds max depth
        if let Some(max) = self.max_depth {
            let excess = self.entries.len().saturating_sub(max);
            if excess > 0 {
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
    }

    /// Step back; `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&GridState> {
        self.cursor = self.cursor.checked_sub(1)?;
        self.current()
    }

    /// Step forward; `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&GridState> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&GridState> {
        self.entries.get(self.cursor).map(|e| &e.state)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry count, at least 1 (the seed state).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Forget everything and reseed with `state`.
    pub fn reset(&mut self, state: GridState, timestamp_ms: u64) {
        self.entries.clear();
        self.entries.push(HistoryEntry {
            timestamp_ms,
            state,
        });
        self.cursor = 0;
    }
}
