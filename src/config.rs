//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::hash::DEFAULT_REPLICAS;
use crate::peers::DEFAULT_BASE_PATH;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Address other peers use to reach this node
    pub self_addr: String,
    /// Full peer set, normally including `self_addr`
    pub peers: Vec<String>,
    /// Path prefix of the peer protocol
    pub base_path: String,
    /// Virtual replicas per peer on the hash ring
    pub replicas: usize,
    /// LRU byte budget of the served group, 0 = unbounded
    pub cache_bytes: usize,
    /// Name of the served group
    pub group_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_ADDR` - this node's base address (default: `http://localhost:<port>`)
    /// - `PEERS` - comma-separated peer addresses (default: `SELF_ADDR`)
    /// - `BASE_PATH` - peer protocol prefix (default: `/_geecache/`)
    /// - `REPLICAS` - virtual nodes per peer (default: 50)
    /// - `CACHE_BYTES` - LRU byte budget (default: 2048)
    /// - `GROUP_NAME` - served group (default: scores)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let server_port = parse_var("SERVER_PORT").unwrap_or(defaults.server_port);
        let self_addr =
            env::var("SELF_ADDR").unwrap_or_else(|_| format!("http://localhost:{}", server_port));
        let peers = env::var("PEERS")
            .map(|peers| split_peers(&peers))
            .ok()
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            server_port,
            self_addr,
            peers,
            base_path: env::var("BASE_PATH").unwrap_or(defaults.base_path),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_addr = "http://localhost:8001".to_string();
        Self {
            server_port: 8001,
            peers: vec![self_addr.clone()],
            self_addr,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            cache_bytes: 2 << 10,
            group_name: "scores".to_string(),
        }
    }
}

/// Reads and parses an environment variable, ignoring unparsable values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn split_peers(peers: &str) -> Vec<String> {
    peers
        .split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(String::from)
        .collect()
}
