//! Peer Client
//!
//! Client half of the peer protocol: fetches one value from the peer that
//! owns it.

use bytes::Bytes;
use reqwest::StatusCode;

use crate::error::PeerError;

// == Peer Client ==
/// HTTP getter bound to one remote peer.
///
/// No retries and no timeout beyond the transport's defaults; the caller
/// decides what a failed fetch means.
#[derive(Debug, Clone)]
pub struct PeerClient {
    /// Peer address joined with the protocol base path,
    /// e.g. `http://10.0.0.2:8001/_geecache/`
    base_url: String,
    http: reqwest::Client,
}

impl PeerClient {
    /// Creates a client for the peer reachable at `base_url`.
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base_url><group>/<key>` with both segments percent-encoded.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }

    // == Get ==
    /// Fetches the raw value for `key` in `group`.
    pub async fn get(&self, group: &str, key: &str) -> Result<Bytes, PeerError> {
        let response = self
            .http
            .get(self.url_for(group, key))
            .send()
            .await
            .map_err(PeerError::Transport)?;

        if response.status() != StatusCode::OK {
            return Err(PeerError::RemoteStatus(response.status()));
        }

        response.bytes().await.map_err(PeerError::Read)
    }
}
