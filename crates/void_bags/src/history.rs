//! Bounded modification log
//!
//! Remembers when each bag slot was last filled, for the most recent
//! [`HISTORY_CAPACITY`] distinct slots. Touching a slot moves it to the back;
//! overflow evicts from the front.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use void_inventory::ItemKind;

/// Number of distinct slots remembered
pub const HISTORY_CAPACITY: usize = 12;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Most-recently-modified log, oldest entry first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationLog {
    entries: VecDeque<(ItemKind, u64)>,
}

impl ModificationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a modification of `kind` at `timestamp`.
    ///
    /// Returns the evicted entry, if the cap was exceeded.
    pub fn touch(&mut self, kind: ItemKind, timestamp: u64) -> Option<ItemKind> {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == kind) {
            self.entries.remove(pos);
        }
        self.entries.push_back((kind, timestamp));

        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front().map(|(k, _)| k)
        } else {
            None
        }
    }

    /// Position in modification order (0 = oldest)
    pub fn rank(&self, kind: &ItemKind) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == kind)
    }

    /// Number of remembered slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is remembered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &(ItemKind, u64)> {
        self.entries.iter()
    }
}
