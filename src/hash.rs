//! Consistent Hash Module
//!
//! Maps keys onto a fixed set of peers. Every peer is placed on a 32-bit
//! ring several times (virtual replicas) and a key belongs to the first
//! replica at or after its own hash, wrapping around at the end.
//!
//! Peers only agree on ownership when they all use the same hash function
//! and replica count.

use std::collections::BTreeMap;

/// Hash function placing keys and replicas on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Virtual replicas per peer when none are configured.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Replica hash to peer. Colliding replicas keep the last peer added.
    ring: BTreeMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            ring: BTreeMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for each peer, hashed from
    /// `"<replica index><peer>"`.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.ring.insert(hash, peer.to_string());
            }
        }
    }

    // == Get ==
    /// Returns the peer owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        let hash = (self.hash)(key.as_bytes());
        self.ring
            .range(hash..)
            .next()
            .or_else(|| self.ring.iter().next())
            .map(|(_, peer)| peer.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}
