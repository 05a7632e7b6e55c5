//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Peer Error ==
/// Failure fetching a value from a remote peer.
///
/// The variants tell the caller which stage failed so it can decide whether
/// to fall back to loading the value locally.
#[derive(Error, Debug)]
pub enum PeerError {
    /// Connection or request could not be completed
    #[error("peer request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Peer answered with something other than 200 OK
    #[error("server returned {0}")]
    RemoteStatus(StatusCode),

    /// Response body could not be read to the end
    #[error("reading response body: {0}")]
    Read(#[source] reqwest::Error),
}

// == Group Error ==
/// Failure inside a group lookup. The display text is what peers see in
/// a 500 response body.
#[derive(Error, Debug)]
pub enum GroupError {
    #[error("key is required")]
    KeyRequired,

    /// Source of truth has no value for the key
    #[error("{0} not exist")]
    NotFound(String),

    /// Source of truth failed while loading
    #[error("load failed: {0}")]
    Load(String),
}

// == Serve Error ==
/// Per-request failures of the inbound peer protocol handler.
#[derive(Error, Debug)]
pub enum ServeError {
    /// Path does not split into `group/key`
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Delegated group lookup failed
    #[error("{0}")]
    Lookup(#[from] GroupError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServeError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServeError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            ServeError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
