//! LRU Cache Module
//!
//! Byte-budgeted least recently used cache.
//!
//! Entries live in an arena of nodes linked by index into a doubly linked
//! recency list, and a key index maps each key to its node. Both `get` and
//! `add` are O(1) amortized.

use std::collections::HashMap;
use std::fmt;

use crate::cache::Value;

/// Null link in the recency list.
const NIL: usize = usize::MAX;

/// Callback invoked with every entry the cache evicts.
pub type OnEvicted<V> = Box<dyn FnMut(String, V) + Send>;

// == Node ==
/// Arena slot. `value` is `None` while the slot sits on the free list.
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: Option<V>,
    prev: usize,
    next: usize,
}

// == LRU Cache ==
/// Least recently used cache bounded by total bytes.
///
/// Each entry accounts for `key.len() + value.len_bytes()` bytes. After every
/// `add`, the oldest entries are evicted until the total fits `max_bytes`
/// again. A `max_bytes` of 0 disables the bound.
///
/// The list runs from `head` (most recently used) to `tail` (least recently
/// used). The cache is not synchronized; wrap it in a lock to share it.
pub struct LruCache<V: Value> {
    /// Byte budget, 0 = unbounded
    max_bytes: usize,
    /// Bytes accounted to live entries
    used_bytes: usize,
    /// Key to arena index
    index: HashMap<String, usize>,
    /// Node arena
    slots: Vec<Node<V>>,
    /// Recycled arena indices
    free: Vec<usize>,
    head: usize,
    tail: usize,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructors ==
    /// Creates an empty cache holding at most `max_bytes` bytes.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports every eviction to `on_evicted`.
    ///
    /// The callback runs synchronously inside the call that evicted the
    /// entry and receives ownership of the removed key and value.
    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    // == Get ==
    /// Looks up a key, marking it as most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].value.as_ref()
    }

    // == Add ==
    /// Inserts or replaces a value and marks it as most recently used.
    ///
    /// Replacing a value applies only the size difference between the old
    /// and the new value and never triggers the eviction callback for the
    /// replaced value.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            let added = value.len_bytes();
            if let Some(old) = self.slots[idx].value.replace(value) {
                self.used_bytes = self.used_bytes.saturating_sub(old.len_bytes());
            }
            self.used_bytes += added;
        } else {
            self.used_bytes += key.len() + value.len_bytes();
            let idx = self.alloc(key.clone(), value);
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes && !self.is_empty() {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&mut self) {
        let idx = self.tail;
        if idx == NIL {
            return;
        }

        self.unlink(idx);
        let node = &mut self.slots[idx];
        let key = std::mem::take(&mut node.key);
        let value = node.value.take();
        self.free.push(idx);
        self.index.remove(&key);

        if let Some(value) = value {
            self.used_bytes = self
                .used_bytes
                .saturating_sub(key.len() + value.len_bytes());
            if let Some(on_evicted) = self.on_evicted.as_mut() {
                on_evicted(key, value);
            }
        }
    }

    // == Accessors ==
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently accounted to live entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks for a key without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            slots: &self.slots,
            cursor: self.head,
        }
    }

    // == Recency List ==
    fn alloc(&mut self, key: String, value: V) -> usize {
        let node = Node {
            key,
            value: Some(value),
            prev: NIL,
            next: NIL,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = node;
                idx
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head == NIL {
            self.tail = idx;
        } else {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head != idx {
            self.unlink(idx);
            self.push_front(idx);
        }
    }
}

impl<V: Value> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

// == Keys Iterator ==
/// Iterator over cache keys in recency order, see [`LruCache::keys`].
pub struct Keys<'a, V> {
    slots: &'a [Node<V>],
    cursor: usize,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.slots[self.cursor];
        self.cursor = node.next;
        Some(&node.key)
    }
}
