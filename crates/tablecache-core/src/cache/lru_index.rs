//! Bounded recency-ordered map backing the table cache index.
//!
//! `FxHashMap` for key lookup plus an arena-backed doubly-linked list for
//! recency order. Lookup, insertion, removal and eviction are O(1).
//!
//! The index never runs side effects on eviction: [`LruIndex::insert`] hands
//! the displaced entry back to the caller, which decides what eviction means.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Null link in the recency list.
const NIL: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: Option<V>,
    prev: usize,
    next: usize,
}

/// Bounded map with least-recently-used eviction.
pub(crate) struct LruIndex<K, V> {
    capacity: usize,
    map: FxHashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    /// Most recently used.
    head: usize,
    /// Least recently used.
    tail: usize,
}

impl<K, V> LruIndex<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty index holding at most `capacity` entries.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "LruIndex capacity must be > 0");
        let reserve = capacity.min(4096);
        Self {
            capacity,
            map: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            nodes: Vec::with_capacity(reserve),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].value.as_ref()
    }

    /// Returns the value for `key` without touching recency.
    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].value.as_ref()
    }

    /// Inserts `key` as the most recently used entry.
    ///
    /// If `key` is already present its value is replaced and the old value is
    /// returned with the key. Otherwise, when the index is full, the least
    /// recently used entry is unlinked first and returned.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            let old = self.nodes[idx].value.replace(value);
            self.move_to_front(idx);
            return old.map(|v| (key, v));
        }

        let evicted = if self.map.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };

        let idx = self.alloc(Node {
            key: key.clone(),
            value: Some(value),
            prev: NIL,
            next: NIL,
        });
        self.push_front(idx);
        self.map.insert(key, idx);

        evicted
    }

    /// Removes `key` from the index.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        self.nodes[idx].value.take()
    }

    /// Unlinks and returns the least recently used entry.
    pub(crate) fn pop_lru(&mut self) -> Option<(K, V)> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        self.free.push(idx);
        let node = &mut self.nodes[idx];
        self.map.remove(&node.key);
        node.value.take().map(|v| (node.key.clone(), v))
    }

    /// Keys from most to least recently used.
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut cursor = self.head;
        while cursor != NIL {
            keys.push(self.nodes[cursor].key.clone());
            cursor = self.nodes[cursor].next;
        }
        keys
    }

    /// Removes every entry, returning the values from most to least recent.
    pub(crate) fn drain(&mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.map.len());
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &mut self.nodes[cursor];
            if let Some(v) = node.value.take() {
                out.push((node.key.clone(), v));
            }
            cursor = node.next;
        }
        self.map.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        out
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}
