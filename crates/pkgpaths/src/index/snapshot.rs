//! Immutable result of one walk.

use super::walk::WalkStats;
use crate::types::Entry;

/// The complete set of entries produced by one rebuild.
///
/// A snapshot is never modified after construction; the store swaps in a
/// new `Arc<IndexSnapshot>` on every rebuild.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    entries: Vec<Entry>,
    stats: WalkStats,
}

impl IndexSnapshot {
    pub fn new(entries: Vec<Entry>, stats: WalkStats) -> Self {
        Self { entries, stats }
    }

    /// Entries in visitation order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries holding a loadable unit.
    pub fn resolvable_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_resolvable()).count()
    }
}
