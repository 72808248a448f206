//! Tracked tables and the handles that grant their use.
//!
//! A [`TrackedTable`] wraps exactly one raw table for its whole life. The
//! cache stores one per table name; every [`TableHandle`] it returns is one
//! grant on that tracked table. Releasing the handle (explicitly or by drop)
//! returns the grant instead of closing the connection. Only the registry
//! decides when the raw table is physically closed, and it is closed at most
//! once.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::registry::{EvictDecision, GrantRegistry, ReleaseDecision, TableId};
use super::stats::CacheCounters;
use crate::error::Error;
use crate::name::TableName;
use crate::opener::RawTable;

/// Why a raw table is being closed, for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseReason {
    /// Evicted with no outstanding handle.
    Evicted,
    /// Last handle released after eviction.
    LastRelease,
    /// Removed from the cache by `invalidate` or `clear`.
    Invalidated,
}

impl CloseReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Evicted => "evicted from the cache",
            Self::LastRelease => "last handle released after eviction",
            Self::Invalidated => "invalidated",
        }
    }
}

pub(crate) struct TrackedTable<T: RawTable> {
    id: TableId,
    name: TableName,
    raw: T,
    registry: Arc<GrantRegistry>,
    counters: Arc<CacheCounters>,
    closed: AtomicBool,
}

impl<T: RawTable> TrackedTable<T> {
    /// Wraps `raw` and records its first grant.
    pub(crate) fn new(
        name: TableName,
        raw: T,
        registry: Arc<GrantRegistry>,
        counters: Arc<CacheCounters>,
    ) -> Self {
        let id = registry.register();
        Self {
            id,
            name,
            raw,
            registry,
            counters,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn id(&self) -> TableId {
        self.id
    }

    pub(crate) fn name(&self) -> &TableName {
        &self.name
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Records one more grant. Caller holds the index lock.
    pub(crate) fn grant(&self) {
        self.registry.grant(self.id);
    }

    /// Records that the table left the cache index. Caller holds the index lock.
    pub(crate) fn evict(&self) -> EvictDecision {
        self.registry.evict(self.id)
    }

    fn release(&self) {
        if self.registry.release(self.id) == ReleaseDecision::Close {
            self.close(CloseReason::LastRelease);
        }
    }

    /// Physically closes the raw table. Later calls are no-ops.
    ///
    /// Failures are logged and swallowed.
    pub(crate) fn close(&self, reason: CloseReason) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        tracing::debug!(
            table = %self.name,
            reason = reason.as_str(),
            "Closing connection to table"
        );

        let failed = match self.raw.close() {
            Ok(()) => false,
            Err(source) => {
                let err = Error::Close {
                    name: self.name.clone(),
                    source,
                };
                tracing::warn!(
                    table = %self.name,
                    code = err.code(),
                    error = %err,
                    "Ignoring failed close since the table is no longer cached"
                );
                true
            }
        };
        self.counters.record_close(failed);
    }
}

/// One grant on a cached table.
///
/// Dereferences to the raw table. Dropping the handle, or calling
/// [`TableHandle::release`], gives the grant back; the connection stays open
/// for other holders and for the cache. A handle can never be used after its
/// release.
pub struct TableHandle<T: RawTable> {
    table: Arc<TrackedTable<T>>,
}

impl<T: RawTable> TableHandle<T> {
    /// Wraps a tracked table whose grant was already recorded.
    pub(crate) fn new(table: Arc<TrackedTable<T>>) -> Self {
        Self { table }
    }

    /// Name this handle was requested with.
    #[must_use]
    pub fn name(&self) -> &TableName {
        self.table.name()
    }

    /// Returns `true` if the raw table has been physically closed.
    ///
    /// Always `false` while this handle is alive.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.table.is_closed()
    }

    /// Returns `true` if both handles grant the same raw table.
    #[must_use]
    pub fn shares_table_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    /// Returns the grant.
    ///
    /// If the table was evicted and this was its last grant, the raw table is
    /// closed here. Close failures are logged, never returned.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: RawTable> Deref for TableHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.table.raw
    }
}

impl<T: RawTable> Drop for TableHandle<T> {
    fn drop(&mut self) {
        self.table.release();
    }
}

impl<T: RawTable> fmt::Debug for TableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandle")
            .field("name", self.table.name())
            .field("id", &self.table.id())
            .field("closed", &self.table.is_closed())
            .finish()
    }
}
