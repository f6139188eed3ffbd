//! Uni Cache - demo server
//!
//! Serves a two-level cache (bounded LRU in front of a swept memory cache)
//! over HTTP.

use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uni_cache::api::create_router;
use uni_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the demo cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the two-level cache
/// 4. Start the background TTL sweep for the memory level
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Stop the sweep and wait for it to exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uni_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Uni Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: l1_capacity={}, default_ttl={}s, port={}, sweep_interval={}s, request_timeout={}ms",
        config.l1_capacity,
        config.default_ttl,
        config.server_port,
        config.sweep_interval,
        config.request_timeout_ms
    );

    let state = AppState::from_config(&config).context("invalid cache configuration")?;
    info!("Cache levels initialized: {}", state.cache.levels());

    let sweeper = spawn_sweep_task(state.memory.clone(), config.sweep_interval());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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
