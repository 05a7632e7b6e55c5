//! Response DTOs for the node API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// One entry of the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub group: String,
    /// Lookups answered from the local cache
    pub hits: u64,
    /// Lookups the local cache could not answer
    pub misses: u64,
    /// Entries dropped by the LRU policy
    pub evictions: u64,
    /// Misses resolved through the group's getter
    pub local_loads: u64,
    /// Misses resolved by a remote peer
    pub peer_loads: u64,
    /// Current number of cached entries
    pub entries: usize,
    /// Bytes accounted to cached entries
    pub used_bytes: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Creates a new GroupStatsResponse from a group's counters and usage
    pub fn new(
        group: impl Into<String>,
        stats: StatsSnapshot,
        entries: usize,
        used_bytes: usize,
    ) -> Self {
        Self {
            group: group.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            local_loads: stats.local_loads,
            peer_loads: stats.peer_loads,
            entries,
            used_bytes,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
