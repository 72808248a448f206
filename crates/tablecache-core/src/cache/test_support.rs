//! In-memory opener used by the cache unit tests.

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::name::TableName;
use crate::opener::{BoxError, RawTable, TableOpener};

pub(super) struct MockTable {
    pub(super) name: TableName,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl MockTable {
    pub(super) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl RawTable for MockTable {
    fn close(&self) -> Result<(), BoxError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(Box::new(std::io::Error::other("connection reset")))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(super) struct MockOpener {
    opens: Mutex<FxHashMap<TableName, usize>>,
    closes: Mutex<FxHashMap<TableName, Vec<Arc<AtomicUsize>>>>,
    fail_open: Mutex<FxHashSet<TableName>>,
    fail_close: Mutex<FxHashSet<TableName>>,
    shutdowns: AtomicUsize,
}

impl MockOpener {
    pub(super) fn fail_open(&self, name: &str) {
        self.fail_open.lock().insert(TableName::from(name));
    }

    pub(super) fn allow_open(&self, name: &str) {
        self.fail_open.lock().remove(&TableName::from(name));
    }

    pub(super) fn fail_close(&self, name: &str) {
        self.fail_close.lock().insert(TableName::from(name));
    }

    /// Successful opens of `name`.
    pub(super) fn opens(&self, name: &str) -> usize {
        self.opens
            .lock()
            .get(&TableName::from(name))
            .copied()
            .unwrap_or(0)
    }

    /// Close calls across every raw table opened for `name`.
    pub(super) fn closes(&self, name: &str) -> usize {
        self.closes
            .lock()
            .get(&TableName::from(name))
            .map_or(0, |all| all.iter().map(|c| c.load(Ordering::SeqCst)).sum())
    }

    pub(super) fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl TableOpener for MockOpener {
    type Table = MockTable;

    fn open(&self, name: &TableName) -> Result<MockTable, BoxError> {
        if self.fail_open.lock().contains(name) {
            return Err(format!("cannot reach region server for {name}").into());
        }
        *self.opens.lock().entry(name.clone()).or_default() += 1;

        let closes = Arc::new(AtomicUsize::new(0));
        self.closes
            .lock()
            .entry(name.clone())
            .or_default()
            .push(Arc::clone(&closes));

        Ok(MockTable {
            name: name.clone(),
            closes,
            fail_close: self.fail_close.lock().contains(name),
        })
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

pub(super) fn name(s: &str) -> TableName {
    TableName::from(s)
}
