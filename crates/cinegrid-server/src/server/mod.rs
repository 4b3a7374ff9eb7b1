//! HTTP server: router, handlers and lifecycle.

mod error;
mod router;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinegrid_api::cache::spawn_sweeper;
use tokio::net::TcpListener;

pub use router::build_router;
pub use state::AppState;

use crate::config::ServerConfig;

/// Binds the listener and serves until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: Arc<AppState>, server: &ServerConfig, sweep_interval: Duration) -> Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let static_dir = if server.static_dir.is_dir() {
        Some(server.static_dir.as_path())
    } else {
        tracing::warn!(
            static_dir = %server.static_dir.display(),
            "Static directory not found; serving API only"
        );
        None
    };

    let sweeper = spawn_sweeper(state.details.cache().clone(), sweep_interval);
    let app = build_router(state, static_dir);

    tracing::info!(addr = %addr, "cinegrid listening");
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error");

    sweeper.abort();
    tracing::info!("Server shutdown complete");
    result
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
