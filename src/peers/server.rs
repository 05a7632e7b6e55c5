//! Peer Server
//!
//! Inbound half of the peer protocol.
//!
//! # Wire Format
//! - `GET <base_path><group>/<key>`, both segments percent-encoded
//! - `200` with `Content-Type: application/octet-stream` and the raw value
//! - `400` when the path is not `group/key`, `404` for an unknown group,
//!   `500` with the error text when the group lookup fails
//!
//! A request outside the base path means the pool is mounted in front of
//! traffic it was never meant to handle. The handler panics instead of
//! answering.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tracing::info;

use crate::error::ServeError;
use crate::group::{Group, GroupRegistry};
use crate::peers::PeerPool;

// == Server State ==
/// State of the peer handler: the pool it serves for and the groups it
/// delegates to.
pub struct PeerServer<R> {
    pub pool: Arc<PeerPool>,
    pub groups: Arc<R>,
}

impl<R> Clone for PeerServer<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            groups: self.groups.clone(),
        }
    }
}

/// Creates a router sending every request to [`serve_peer`].
pub fn peer_router<R: GroupRegistry>(pool: Arc<PeerPool>, groups: Arc<R>) -> Router {
    Router::new()
        .fallback(serve_peer::<R>)
        .with_state(PeerServer { pool, groups })
}

// == Serve Peer ==
/// Answers one peer request from the local groups.
///
/// # Panics
/// When the request path does not start with the pool's base path.
pub async fn serve_peer<R: GroupRegistry>(
    State(server): State<PeerServer<R>>,
    method: Method,
    uri: Uri,
) -> Result<Response, ServeError> {
    let pool = &server.pool;
    let path = uri.path();
    let Some(rest) = path.strip_prefix(pool.base_path()) else {
        panic!("PeerPool serving unexpected path: {}", path);
    };
    info!("[Server {}] {} {}", pool.self_addr(), method, path);

    if method != Method::GET {
        return Err(ServeError::MethodNotAllowed(method));
    }

    let (group_name, key) = split_group_key(rest)?;
    let group = server
        .groups
        .lookup(&group_name)
        .ok_or(ServeError::GroupNotFound(group_name))?;

    let view = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.raw_bytes(),
    )
        .into_response())
}

/// Splits `<group>/<key>` at the first slash and decodes both segments.
/// Slashes inside the key must arrive encoded or stay part of the key.
fn split_group_key(rest: &str) -> Result<(String, String), ServeError> {
    let (group, key) = rest
        .split_once('/')
        .ok_or_else(|| ServeError::BadRequest(format!("expected <group>/<key>, got {:?}", rest)))?;

    Ok((decode_segment(group)?, decode_segment(key)?))
}

fn decode_segment(segment: &str) -> Result<String, ServeError> {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .map_err(|_| ServeError::BadRequest(format!("segment {:?} is not valid UTF-8", segment)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ByteView;
    use crate::error::GroupError;
    use crate::group::{Groups, MemoryGroup};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn scores(key: &str) -> Result<ByteView, GroupError> {
        match key {
            "Tom" => Ok(ByteView::from("630")),
            "a b/c" => Ok(ByteView::from(vec![0u8, 159, 146, 150])),
            _ => Err(GroupError::NotFound(key.to_string())),
        }
    }

    fn create_test_app() -> Router {
        let pool = Arc::new(PeerPool::new("http://localhost:8001"));
        let groups = Groups::new().with_group(MemoryGroup::new("scores", 2 << 10, scores));
        peer_router(pool, Arc::new(groups))
    }

    async fn send(app: Router, method: &str, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_serves_raw_value() {
        let response = send(create_test_app(), "GET", "/_geecache/scores/Tom").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(body_bytes(response).await, b"630");
    }

    #[tokio::test]
    async fn test_decodes_segments() {
        let response = send(create_test_app(), "GET", "/_geecache/scores/a%20b%2Fc").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, vec![0u8, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_single_segment_is_bad_request() {
        let response = send(create_test_app(), "GET", "/_geecache/onlyonesegment").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_utf8_segment_is_bad_request() {
        let response = send(create_test_app(), "GET", "/_geecache/scores/%FF").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let response = send(create_test_app(), "GET", "/_geecache/missing/Tom").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"no such group: missing");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_server_error() {
        let response = send(create_test_app(), "GET", "/_geecache/scores/unknown").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, b"unknown not exist");
    }

    #[tokio::test]
    async fn test_empty_key_is_server_error() {
        let response = send(create_test_app(), "GET", "/_geecache/scores/").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, b"key is required");
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let response = send(create_test_app(), "POST", "/_geecache/scores/Tom").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected path")]
    async fn test_foreign_prefix_panics() {
        send(create_test_app(), "GET", "/other/scores/Tom").await;
    }

    #[test]
    fn test_split_group_key_keeps_raw_slashes_in_key() {
        let (group, key) = split_group_key("scores/a/b").unwrap();
        assert_eq!(group, "scores");
        assert_eq!(key, "a/b");
    }
}
