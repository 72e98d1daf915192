mod dto;
mod handlers;
mod router;

pub use handlers::AppState;
pub use router::create_router;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind `addr` and serve until Ctrl-C
pub async fn start_server(addr: SocketAddr, state: AppState, enable_sessions: bool) -> Result<()> {
    let app = create_router(Arc::new(state), enable_sessions);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("AgentMeter server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("AgentMeter server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
