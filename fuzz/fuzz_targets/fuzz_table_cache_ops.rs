//! Fuzz target for table cache operation sequences.
//!
//! Drives a small cache with arbitrary interleavings of lookups, releases,
//! invalidations and clears, and checks after every step that:
//! - the cache never holds more tables than its capacity
//! - a table reachable through a live handle is never closed
//! - no raw table is closed twice
//! - once every handle is gone, each opened table is cached or closed

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tablecache_core::{BoxError, RawTable, TableCache, TableName, TableOpener};

#[derive(Arbitrary, Debug)]
enum Op {
    Get(u8),
    Release(u8),
    Touch(u8),
    Invalidate(u8),
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

struct FuzzTable {
    closes: Arc<AtomicUsize>,
}

impl RawTable for FuzzTable {
    fn close(&self) -> Result<(), BoxError> {
        assert_eq!(self.closes.fetch_add(1, Ordering::SeqCst), 0, "double close");
        Ok(())
    }
}

#[derive(Default)]
struct FuzzOpener {
    opened: Mutex<Vec<Arc<AtomicUsize>>>,
}

impl TableOpener for FuzzOpener {
    type Table = FuzzTable;

    fn open(&self, _name: &TableName) -> Result<FuzzTable, BoxError> {
        let closes = Arc::new(AtomicUsize::new(0));
        self.opened.lock().unwrap().push(Arc::clone(&closes));
        Ok(FuzzTable { closes })
    }

    fn shutdown(&self) {}
}

fn name(n: u8) -> TableName {
    TableName::from(vec![b't', n % 16])
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity % 8) + 1;
    let cache = TableCache::new(FuzzOpener::default(), capacity).unwrap();
    let mut held = Vec::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Get(n) => held.push(cache.get_handle(&name(n)).unwrap()),
            Op::Release(i) if !held.is_empty() => {
                let idx = usize::from(i) % held.len();
                held.swap_remove(idx).release();
            }
            Op::Release(_) => {}
            Op::Touch(n) => cache.get_handle(&name(n)).unwrap().release(),
            Op::Invalidate(n) => {
                cache.invalidate(&name(n));
            }
            Op::Clear => cache.clear(),
        }

        assert!(cache.len() <= capacity);
        assert_eq!(cache.outstanding_handles(), held.len());
        for handle in &held {
            assert_eq!(handle.closes.load(Ordering::SeqCst), 0);
        }
    }

    drop(held);
    let opened = cache.opener().opened.lock().unwrap();
    let closed = opened
        .iter()
        .filter(|c| c.load(Ordering::SeqCst) == 1)
        .count();
    assert_eq!(opened.len(), closed + cache.len());
});
