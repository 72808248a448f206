//! Bounded cache of shared table connections.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::handle::{CloseReason, TableHandle, TrackedTable};
use super::lru_index::LruIndex;
use super::registry::{EvictDecision, GrantRegistry};
use super::stats::{CacheCounters, CacheStats};
use crate::config::TableCacheConfig;
use crate::error::{Error, Result};
use crate::name::TableName;
use crate::opener::TableOpener;

type Tracked<O> = Arc<TrackedTable<<O as TableOpener>::Table>>;

/// Thread-safe LRU cache of open tables.
///
/// [`TableCache::get_handle`] reuses the cached connection for a name or
/// opens a new one through the opener. When the cache is full, the least
/// recently requested table leaves the index. Its connection is closed right
/// away if nobody holds a handle to it, otherwise by the release of the last
/// outstanding handle.
///
/// Every lookup, hit or miss, makes the table the most recently used.
pub struct TableCache<O: TableOpener> {
    opener: O,
    capacity: usize,
    /// Name -> tracked table, in recency order.
    index: Mutex<LruIndex<TableName, Tracked<O>>>,
    /// Outstanding grants, shared with every tracked table.
    registry: Arc<GrantRegistry>,
    counters: Arc<CacheCounters>,
}

impl<O: TableOpener> TableCache<O> {
    /// Creates a cache holding at most `capacity` open tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `capacity` is zero.
    pub fn new(opener: O, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::Config(
                "table cache capacity must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            opener,
            capacity,
            index: Mutex::new(LruIndex::new(capacity)),
            registry: Arc::new(GrantRegistry::new()),
            counters: Arc::new(CacheCounters::default()),
        })
    }

    /// Creates a cache sized by `config.cache.size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn from_config(opener: O, config: &TableCacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(opener, config.cache_size())
    }

    /// Returns a handle to the table called `name`.
    ///
    /// Reuses the cached connection when present; otherwise opens one and
    /// caches it, evicting the least recently used table if the cache is full.
    /// The returned handle holds one grant until it is released or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the opener fails. Nothing is cached for
    /// `name` in that case, so the next call tries again.
    pub fn get_handle(&self, name: &TableName) -> Result<TableHandle<O::Table>> {
        let mut retired = None;

        let table = {
            let mut index = self.index.lock();

            if let Some(table) = index.get(name) {
                let table = Arc::clone(table);
                table.grant();
                self.counters.record_hit();
                table
            } else {
                self.counters.record_miss();

                let raw = self.opener.open(name).map_err(|source| Error::Open {
                    name: name.clone(),
                    source,
                })?;
                let table = Arc::new(TrackedTable::new(
                    name.clone(),
                    raw,
                    Arc::clone(&self.registry),
                    Arc::clone(&self.counters),
                ));
                tracing::trace!(table = %name, "Opened table");

                if let Some((_, victim)) = index.insert(name.clone(), Arc::clone(&table)) {
                    retired = self.evict(victim);
                }
                debug_assert!(index.len() <= index.capacity());
                table
            }
        };

        if let Some(victim) = retired {
            victim.close(CloseReason::Evicted);
        }

        Ok(TableHandle::new(table))
    }

    /// Removes `name` from the cache.
    ///
    /// The connection is closed now if no handle is outstanding, otherwise on
    /// the last release. Returns `false` if `name` was not cached.
    pub fn invalidate(&self, name: &TableName) -> bool {
        let removed = self.index.lock().remove(name);
        let Some(table) = removed else {
            return false;
        };

        if table.evict() == EvictDecision::Close {
            table.close(CloseReason::Invalidated);
        }
        true
    }

    /// Removes every table from the cache, as [`TableCache::invalidate`] does.
    pub fn clear(&self) {
        let drained = self.index.lock().drain();
        for (_, table) in drained {
            if table.evict() == EvictDecision::Close {
                table.close(CloseReason::Invalidated);
            }
        }
    }

    /// Shuts down the opener.
    ///
    /// Cached connections are left to the opener; outstanding handles stay
    /// valid until released.
    pub fn shutdown(&self) {
        tracing::info!(cached = self.len(), "Shutting down table opener");
        self.opener.shutdown();
    }

    /// Maximum number of cached tables.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tables currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    /// Returns `true` if no table is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.lock().is_empty()
    }

    /// Returns `true` if `name` is cached. Does not affect recency.
    #[must_use]
    pub fn contains(&self, name: &TableName) -> bool {
        self.index.lock().contains(name)
    }

    /// Outstanding handles on the cached table `name`, 0 if not cached.
    #[must_use]
    pub fn active_grants(&self, name: &TableName) -> usize {
        let index = self.index.lock();
        index
            .peek(name)
            .map_or(0, |table| self.registry.grants(table.id()))
    }

    /// Cached names from most to least recently used.
    #[must_use]
    pub fn names_by_recency(&self) -> Vec<TableName> {
        self.index.lock().keys_by_recency()
    }

    /// Number of tables, cached or evicted, with outstanding handles.
    #[must_use]
    pub fn tables_in_use(&self) -> usize {
        self.registry.tracked()
    }

    /// Total outstanding handles across all tables.
    #[must_use]
    pub fn outstanding_handles(&self) -> usize {
        self.registry.total_grants()
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// The opener this cache delegates to.
    #[must_use]
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Settles the fate of an entry pushed out by capacity. Runs under the
    /// index lock; returns the table to close once the lock is dropped.
    fn evict(&self, victim: Tracked<O>) -> Option<Tracked<O>> {
        match victim.evict() {
            EvictDecision::Close => {
                self.counters.record_eviction(false);
                Some(victim)
            }
            EvictDecision::Deferred(grants) => {
                self.counters.record_eviction(true);
                tracing::debug!(
                    table = %victim.name(),
                    grants,
                    "Evicted table still in use, close deferred to last release"
                );
                None
            }
        }
    }
}

impl<O: TableOpener> fmt::Debug for TableCache<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
