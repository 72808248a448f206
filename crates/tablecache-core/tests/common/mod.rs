//! Shared in-memory opener for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tablecache_core::{BoxError, RawTable, TableName, TableOpener};

/// Raw table that counts its closes and flags double closes.
pub struct CountingTable {
    pub name: TableName,
    closes: Arc<AtomicUsize>,
}

impl CountingTable {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl RawTable for CountingTable {
    fn close(&self) -> Result<(), BoxError> {
        let previous = self.closes.fetch_add(1, Ordering::SeqCst);
        assert_eq!(previous, 0, "table {} closed twice", self.name);
        Ok(())
    }
}

/// Opener recording every table it produced.
#[derive(Default)]
pub struct CountingOpener {
    opened: Mutex<HashMap<TableName, Vec<Arc<AtomicUsize>>>>,
}

impl CountingOpener {
    pub fn opens(&self, name: &TableName) -> usize {
        self.opened
            .lock()
            .expect("lock")
            .get(name)
            .map_or(0, Vec::len)
    }

    pub fn closes(&self, name: &TableName) -> usize {
        self.opened.lock().expect("lock").get(name).map_or(0, |all| {
            all.iter().map(|c| c.load(Ordering::SeqCst)).sum()
        })
    }

    pub fn total_opens(&self) -> usize {
        self.opened.lock().expect("lock").values().map(Vec::len).sum()
    }

    pub fn total_closes(&self) -> usize {
        self.opened
            .lock()
            .expect("lock")
            .values()
            .flatten()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

impl TableOpener for CountingOpener {
    type Table = CountingTable;

    fn open(&self, name: &TableName) -> Result<CountingTable, BoxError> {
        let closes = Arc::new(AtomicUsize::new(0));
        self.opened
            .lock()
            .expect("lock")
            .entry(name.clone())
            .or_default()
            .push(Arc::clone(&closes));
        Ok(CountingTable {
            name: name.clone(),
            closes,
        })
    }

    fn shutdown(&self) {}
}

pub fn table(i: usize) -> TableName {
    TableName::from(format!("table_{i}"))
}
