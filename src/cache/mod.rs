//! Cache Module
//!
//! Local storage: a byte-budgeted LRU cache, the value capability it stores,
//! and the counters groups keep about it.

mod lru;
mod stats;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use lru::{Keys, LruCache, OnEvicted};
pub use stats::{CacheStats, StatsSnapshot};
pub use value::{ByteView, Value};
