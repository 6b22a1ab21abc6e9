pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod routes;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::app_state::build_app_state;
use crate::config::AppConfig;

/// Bind, serve until ctrl-c or SIGTERM, then drop every open cluster session.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.server.bind_addr();
    let max_upload_bytes = config.server.max_upload_bytes;

    let state = build_app_state(config);
    let sessions = state.sessions.clone();
    let app = routes::app_router(max_upload_bytes).with_state(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("ttlens listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    let closed = sessions.close_all().await;
    info!("Shutdown complete ({} session(s) closed)", closed);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
