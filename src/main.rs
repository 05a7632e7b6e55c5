//! GeeCache - distributed in-memory cache node
//!
//! Serves one cache group and the peer protocol for a fixed set of peers.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geecache::error::GroupError;
use geecache::{create_router, ByteView, Config, Groups, MemoryGroup, PeerPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the peer pool and register the peer set
/// 4. Create the served group, routed through the pool
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geecache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GeeCache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, base_path={}, replicas={}, cache_bytes={}, port={}",
        config.self_addr,
        config.peers,
        config.base_path,
        config.replicas,
        config.cache_bytes,
        config.server_port
    );

    let pool = Arc::new(
        PeerPool::new(config.self_addr.clone())
            .with_base_path(config.base_path.clone())
            .with_replicas(config.replicas),
    );
    pool.set(config.peers.clone());

    let group = MemoryGroup::new(&config.group_name, config.cache_bytes, demo_source)
        .with_peers(pool.clone());
    let groups = Arc::new(Groups::new().with_group(group));
    info!("Group '{}' initialized", config.group_name);

    let app = create_router(pool, groups);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Slow source of truth behind the cache.
fn demo_source(key: &str) -> Result<ByteView, GroupError> {
    info!("[SlowDB] search key {}", key);
    match key {
        "Tom" => Ok(ByteView::from("630")),
        "Jack" => Ok(ByteView::from("589")),
        "Sam" => Ok(ByteView::from("567")),
        _ => Err(GroupError::NotFound(key.to_string())),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
