//! API Module
//!
//! HTTP surface of a cache node.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Per-group cache statistics
//! - `GET <base_path><group>/<key>` - Peer protocol

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
