//! API Routes
//!
//! Assembles the node's router: admin endpoints plus the peer protocol.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, stats_handler};
use crate::group::Groups;
use crate::peers::{peer_router, PeerPool};

/// Creates the node router.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Per-group cache statistics
/// - anything else - peer protocol under the pool's base path
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(pool: Arc<PeerPool>, groups: Arc<Groups>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .with_state(groups.clone())
        .merge(peer_router(pool, groups))
        .layer(TraceLayer::new_for_http())
}
