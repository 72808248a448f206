//! Cache statistics for monitoring.

#![allow(clippy::cast_precision_loss)] // Precision loss acceptable for hit rate calculation

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of table cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served by a cached table.
    pub hits: u64,
    /// Lookups that had to open a table.
    pub misses: u64,
    /// Tables removed from the index to respect capacity.
    pub evictions: u64,
    /// Evictions whose close waited for outstanding handles.
    pub deferred_closes: u64,
    /// Physical closes performed.
    pub closes: u64,
    /// Physical closes that failed and were ignored.
    pub close_failures: u64,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Live counters, shared between the cache and its tracked tables.
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    deferred_closes: AtomicU64,
    closes: AtomicU64,
    close_failures: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self, deferred: bool) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        if deferred {
            self.deferred_closes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_close(&self, failed: bool) {
        self.closes.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.close_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            deferred_closes: self.deferred_closes.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
            close_failures: self.close_failures.load(Ordering::Relaxed),
        }
    }
}
