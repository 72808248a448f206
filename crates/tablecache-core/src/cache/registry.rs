//! Active-use registry shared by every table a cache hands out.
//!
//! Each outstanding [`TableHandle`](super::TableHandle) is one *grant* on its
//! tracked table. The registry counts grants per table and remembers which
//! tables have left the cache index, so that whoever drops the count of an
//! evicted table to zero performs the physical close.
//!
//! All decisions are taken under a single mutex, distinct from the index
//! lock. Callers act on a [`ReleaseDecision::Close`] or [`EvictDecision::Close`]
//! after the lock is dropped; both are terminal for the table involved.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one tracked table within a registry.
pub(crate) type TableId = u64;

/// Outcome of returning one grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseDecision {
    /// Other grants remain, or the table is still cached.
    Retain,
    /// Nobody holds the table and it is no longer cached.
    Close,
}

/// Outcome of removing a table from the cache index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EvictDecision {
    /// No grant is outstanding; close now.
    Close,
    /// Grants are outstanding; the last release closes.
    Deferred(usize),
}

#[derive(Debug, Default)]
struct Grants {
    count: usize,
    evicted: bool,
}

/// Grant ledger for the tables of one cache.
///
/// Only tables with at least one outstanding grant have an entry.
#[derive(Debug, Default)]
pub(crate) struct GrantRegistry {
    entries: Mutex<FxHashMap<TableId, Grants>>,
    next_id: AtomicU64,
}

impl GrantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates an id for a new table and records its first grant.
    pub(crate) fn register(&self) -> TableId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.grant(id);
        id
    }

    /// Records one more grant on `id`.
    pub(crate) fn grant(&self, id: TableId) {
        let mut entries = self.entries.lock();
        let grants = entries.entry(id).or_default();
        debug_assert!(!grants.evicted, "grant on evicted table {id}");
        grants.count += 1;
    }

    /// Returns one grant on `id`.
    pub(crate) fn release(&self, id: TableId) -> ReleaseDecision {
        let mut entries = self.entries.lock();
        let Some(grants) = entries.get_mut(&id) else {
            return ReleaseDecision::Close;
        };

        grants.count -= 1;
        if grants.count > 0 {
            return ReleaseDecision::Retain;
        }

        let evicted = grants.evicted;
        entries.remove(&id);
        if evicted {
            ReleaseDecision::Close
        } else {
            ReleaseDecision::Retain
        }
    }

    /// Marks `id` as gone from the cache index.
    pub(crate) fn evict(&self, id: TableId) -> EvictDecision {
        let mut entries = self.entries.lock();
        match entries.get_mut(&id) {
            None => EvictDecision::Close,
            Some(grants) => {
                grants.evicted = true;
                EvictDecision::Deferred(grants.count)
            }
        }
    }

    /// Outstanding grants on `id`.
    #[must_use]
    pub(crate) fn grants(&self, id: TableId) -> usize {
        self.entries.lock().get(&id).map_or(0, |g| g.count)
    }

    /// Number of tables with at least one outstanding grant.
    #[must_use]
    pub(crate) fn tracked(&self) -> usize {
        self.entries.lock().len()
    }

    /// Sum of outstanding grants across all tables.
    #[must_use]
    pub(crate) fn total_grants(&self) -> usize {
        self.entries.lock().values().map(|g| g.count).sum()
    }
}
