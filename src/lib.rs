//! GeeCache - distributed in-memory cache node
//!
//! Each node keeps a byte-budgeted LRU cache and owns a shard of the
//! keyspace chosen by consistent hashing. Nodes fetch keys they do not own
//! from their owners over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod hash;
pub mod models;
pub mod peers;

pub use api::create_router;
pub use cache::{ByteView, LruCache, Value};
pub use config::Config;
pub use group::{Group, GroupRegistry, Groups, MemoryGroup};
pub use hash::HashRing;
pub use peers::{PeerClient, PeerPicker, PeerPool};
