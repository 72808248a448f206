//! Caching layer for shared table connections.
//!
//! - [`TableCache`]: bounded LRU index of open tables
//! - [`TableHandle`]: one grant on a cached table, released on drop
//! - Grant registry: decides when an evicted table is physically closed
//! - Cache statistics and monitoring
//!
//! # Thread-Safety & Lock Ordering
//!
//! All structures are thread-safe via `parking_lot::Mutex`.
//!
//! **Lock Hierarchy (acquire in this order to prevent deadlocks):**
//! 1. `TableCache.index` (Mutex)
//! 2. `GrantRegistry.entries` (Mutex)
//!
//! Releasing a handle takes only the registry lock. Physical closes run after
//! both locks are dropped.

mod handle;
mod lru_index;
mod registry;
mod stats;
mod table_cache;

pub use handle::TableHandle;
pub use stats::CacheStats;
pub use table_cache::TableCache;

#[cfg(test)]
mod test_support;
