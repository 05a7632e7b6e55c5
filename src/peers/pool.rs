//! Peer Pool
//!
//! Registry of the cluster's peers. Answers which peer owns a key and
//! hands out the client used to reach it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::hash::{HashFn, HashRing, DEFAULT_REPLICAS};
use crate::peers::PeerClient;

/// Path prefix of the peer protocol when none is configured.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

// == Peer Picker ==
/// Chooses the remote peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owner's client, or `None` when the key should be
    /// handled locally.
    fn pick_peer(&self, key: &str) -> Option<Arc<PeerClient>>;
}

// == Peer Registry ==
/// Ring and clients, always replaced together.
#[derive(Debug, Default)]
struct PeerRegistry {
    ring: HashRing,
    clients: HashMap<String, Arc<PeerClient>>,
}

// == Peer Pool ==
pub struct PeerPool {
    /// This node's base address, e.g. `http://10.0.0.1:8001`
    self_addr: String,
    base_path: String,
    replicas: usize,
    hash: Option<HashFn>,
    /// Shared connection pool for every peer client
    http: reqwest::Client,
    registry: RwLock<PeerRegistry>,
}

impl PeerPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_addr`, with no peers.
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self {
            self_addr: self_addr.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
            http: reqwest::Client::new(),
            registry: RwLock::new(PeerRegistry::default()),
        }
    }

    /// Serves and fetches under `base_path`. Must start and end with `/`.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Virtual replicas per peer on rings built by [`PeerPool::set`].
    #[must_use]
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Hash function for rings built by [`PeerPool::set`].
    #[must_use]
    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = Some(hash);
        self
    }

    /// HTTP client cloned into every peer client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    // == Set ==
    /// Replaces the whole peer set.
    ///
    /// Include this node's own address so every node builds the same ring.
    /// The new ring and clients become visible together.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(self.replicas, self.hash);
        ring.add(&peers);
        let clients = peers
            .iter()
            .map(|peer| {
                let client = PeerClient::new(
                    format!("{}{}", peer, self.base_path),
                    self.http.clone(),
                );
                (peer.clone(), Arc::new(client))
            })
            .collect();

        *self.registry.write() = PeerRegistry { ring, clients };
        info!("[Server {}] Peers set to {:?}", self.self_addr, peers);
    }

    // == Pick Peer ==
    /// Returns the client of the peer owning `key`, unless that peer is this
    /// node or no peers are set.
    pub fn pick_peer(&self, key: &str) -> Option<Arc<PeerClient>> {
        let registry = self.registry.read();
        let picked = registry
            .ring
            .get(key)
            .filter(|peer| *peer != self.self_addr)
            .and_then(|peer| registry.clients.get(peer).map(|client| (peer, client)));

        match picked {
            Some((peer, client)) => {
                info!("[Server {}] Pick peer {}", self.self_addr, peer);
                Some(client.clone())
            }
            None => {
                debug!("[Server {}] Key {} stays local", self.self_addr, key);
                None
            }
        }
    }

    // == Accessors ==
    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Currently configured peers, in no particular order.
    pub fn peers(&self) -> Vec<String> {
        self.registry.read().clients.keys().cloned().collect()
    }
}

impl PeerPicker for PeerPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<PeerClient>> {
        PeerPool::pick_peer(self, key)
    }
}

impl fmt::Debug for PeerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerPool")
            .field("self_addr", &self.self_addr)
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("peers", &self.peers())
            .finish()
    }
}
