//! Job Portal Cache - HTTP front for the cache and popular-search layer
//!
//! Serves cached backend lookups and popular-search rankings to UI clients.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_portal_cache::api::create_router;
use job_portal_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the job-portal cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build backend client, cache and popular-search service
/// 4. Start the expired-entry sweep unless disabled
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "job_portal_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Portal Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={}, default_ttl={}ms, popular_cache={}s, port={}, cleanup_interval={}s",
        config.backend_base_url,
        config.default_ttl_ms,
        config.popular_cache_secs,
        config.server_port,
        config.cleanup_interval
    );

    let state = AppState::from_config(&config).context("failed to build application state")?;
    info!("Cache and popular-search service initialized");

    let cleanup_handle = if config.cleanup_interval > 0 {
        info!("Background sweep task started");
        Some(spawn_cleanup_task(state.cache.clone(), config.cleanup_interval))
    } else {
        info!("Background sweep disabled, relying on lazy eviction");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
