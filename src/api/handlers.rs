//! API Handlers
//!
//! Node-level endpoints served next to the peer protocol.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::group::Groups;
use crate::models::{GroupStatsResponse, HealthResponse};

/// Handler for GET /stats
///
/// Returns counters and cache usage of every group, sorted by name.
pub async fn stats_handler(State(groups): State<Arc<Groups>>) -> Json<Vec<GroupStatsResponse>> {
    let mut stats: Vec<GroupStatsResponse> = groups
        .iter()
        .map(|group| {
            let (entries, used_bytes) = group.usage();
            GroupStatsResponse::new(group.name(), group.stats(), entries, used_bytes)
        })
        .collect();
    stats.sort_by(|a, b| a.group.cmp(&b.group));

    Json(stats)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
