//! Peers Module
//!
//! Peer routing and the HTTP protocol peers use to fetch values from each
//! other.
//!
//! # Components
//! - [`PeerPool`] - peer registry and key ownership
//! - [`PeerClient`] - outbound `GET <base_path><group>/<key>`
//! - [`peer_router`] - inbound handler for the same requests

mod client;
mod pool;
mod server;

pub use client::PeerClient;
pub use pool::{PeerPicker, PeerPool, DEFAULT_BASE_PATH};
pub use server::{peer_router, serve_peer, PeerServer};
