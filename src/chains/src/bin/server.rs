//! # Accesstrace HTTP Server
//!
//! Serves access paths, graphs and statistics over a point-in-time
//! relationship snapshot. See [`accesstrace_chains::api`] for endpoints.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT` - HTTP server port (default: 8080)
//! - `SNAPSHOT_PATH` - JSON snapshot to load (default: bundled sample org)
//! - `RUST_LOG` - Log level (default: info)
//! - `CACHE_SIZE` - Chain cache capacity (default: 10000)
//! - `CACHE_TTL` - Chain cache TTL in seconds (default: 60)
//! - `PARALLEL_BATCHES` - Set to "false" to resolve batches sequentially

use accesstrace_chains::api::{create_router, AppState};
use accesstrace_chains::{AccessEngine, Result, ServerConfig, Snapshot};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BUNDLED_SNAPSHOT: &str = include_str!("../../fixtures/org_snapshot.json");

fn load_snapshot(config: &ServerConfig) -> Result<Snapshot> {
    match &config.snapshot_path {
        Some(path) => {
            info!("Loading snapshot from {}", path.display());
            Snapshot::from_path(path)
        }
        None => {
            info!("No SNAPSHOT_PATH set, serving the bundled sample organization");
            Snapshot::from_json_str(BUNDLED_SNAPSHOT)
        }
    }
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Accesstrace Server v{}", accesstrace_chains::VERSION);

    let config = ServerConfig::from_env();
    info!("Configuration:");
    info!("  Port: {}", config.port);
    info!("  Cache Size: {}", config.engine.max_cache_size);
    info!("  Cache TTL: {:?}", config.engine.cache_ttl);
    info!("  Parallel Batches: {}", config.engine.parallel_batches);

    let engine = load_snapshot(&config)
        .and_then(|snapshot| AccessEngine::from_snapshot(snapshot, config.engine.clone()));
    let engine = match engine {
        Ok(e) => e,
        Err(e) => {
            error!("Failed to initialize engine: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Engine initialization failed: {}", e),
            ));
        }
    };

    let app = create_router(AppState::new(Arc::new(engine)));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Starting HTTP server on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind HTTP server: {}", e);
            return Err(e);
        }
    };

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("HTTP server error: {}", e);
            e
        })?;

    info!("Server shut down gracefully");
    Ok(())
}
