//! Group Module
//!
//! The inbound peer handler does not know how a value is produced; it only
//! needs to find a named group and ask it for a key. This module defines
//! those two seams ([`GroupRegistry`] and [`Group`]) plus a small in-memory
//! group used by the binary and the tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, LruCache, StatsSnapshot};
use crate::error::GroupError;
use crate::peers::PeerPicker;

// == Collaborator Traits ==
/// A named cache namespace that can produce the value for a key.
pub trait Group: Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Result<ByteView, GroupError>> + Send;
}

/// Looks up groups by name.
pub trait GroupRegistry: Send + Sync + 'static {
    type Group: Group;

    fn lookup(&self, name: &str) -> Option<Arc<Self::Group>>;
}

/// Source of truth consulted when no cache has the key.
pub trait Getter: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<ByteView, GroupError>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> Result<ByteView, GroupError> + Send + Sync + 'static,
{
    fn get(&self, key: &str) -> Result<ByteView, GroupError> {
        self(key)
    }
}

// == Memory Group ==
/// Group backed by a local LRU cache, remote peers and a getter.
///
/// Lookups go local cache, then the owning peer, then the getter. Values
/// fetched from a peer are not cached here; the owner caches them.
pub struct MemoryGroup {
    name: String,
    cache: Mutex<LruCache<ByteView>>,
    getter: Box<dyn Getter>,
    peers: Option<Arc<dyn PeerPicker>>,
    stats: Arc<CacheStats>,
}

impl MemoryGroup {
    /// Creates a group caching at most `cache_bytes` bytes (0 = unbounded).
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: impl Getter) -> Self {
        let name = name.into();
        let stats = Arc::new(CacheStats::new());

        let evictions = stats.clone();
        let group_name = name.clone();
        let cache = LruCache::with_eviction_callback(cache_bytes, move |key, _: ByteView| {
            evictions.record_eviction();
            debug!("[Group {}] evicted {}", group_name, key);
        });

        Self {
            name,
            cache: Mutex::new(cache),
            getter: Box::new(getter),
            peers: None,
            stats,
        }
    }

    /// Routes misses through `peers` before falling back to the getter.
    #[must_use]
    pub fn with_peers(mut self, peers: Arc<dyn PeerPicker>) -> Self {
        self.peers = Some(peers);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a value in the local cache.
    pub fn populate(&self, key: impl Into<String>, value: ByteView) {
        self.cache.lock().add(key, value);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of cached entries and bytes they account for.
    pub fn usage(&self) -> (usize, usize) {
        let cache = self.cache.lock();
        (cache.len(), cache.used_bytes())
    }

    // == Lookup ==
    pub async fn lookup(&self, key: &str) -> Result<ByteView, GroupError> {
        if key.is_empty() {
            return Err(GroupError::KeyRequired);
        }

        let cached = self.cache.lock().get(key).cloned();
        if let Some(value) = cached {
            self.stats.record_hit();
            debug!("[Group {}] hit {}", self.name, key);
            return Ok(value);
        }
        self.stats.record_miss();

        if let Some(peer) = self.peers.as_ref().and_then(|peers| peers.pick_peer(key)) {
            match peer.get(&self.name, key).await {
                Ok(bytes) => {
                    self.stats.record_peer_load();
                    return Ok(ByteView::from(bytes));
                }
                Err(err) => warn!("[Group {}] Failed to get from peer: {}", self.name, err),
            }
        }

        let value = self.getter.get(key)?;
        self.stats.record_local_load();
        self.populate(key, value.clone());
        Ok(value)
    }
}

impl Group for MemoryGroup {
    fn get(&self, key: &str) -> impl Future<Output = Result<ByteView, GroupError>> + Send {
        self.lookup(key)
    }
}

// == Groups ==
/// Fixed set of groups, built once before serving.
#[derive(Default)]
pub struct Groups {
    groups: HashMap<String, Arc<MemoryGroup>>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group under its own name, replacing any previous one.
    #[must_use]
    pub fn with_group(mut self, group: MemoryGroup) -> Self {
        self.groups.insert(group.name().to_string(), Arc::new(group));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MemoryGroup>> {
        self.groups.values()
    }
}

impl GroupRegistry for Groups {
    type Group = MemoryGroup;

    fn lookup(&self, name: &str) -> Option<Arc<MemoryGroup>> {
        self.groups.get(name).cloned()
    }
}
