use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::task;
use tracing::warn;

use crate::usage::{active_sessions, aggregate_usage, ScanOptions};

use super::dto::*;

/// Shared application state
pub struct AppState {
    pub options: ScanOptions,
}

/// Month-to-date usage ledger
pub async fn get_usage(State(state): State<Arc<AppState>>) -> Json<UsageResponse> {
    let records = run_scan(state, |options| aggregate_usage(options, Utc::now())).await;

    Json(UsageResponse {
        records,
        has_clawdbot: true,
    })
}

/// Active sessions ranked by context saturation
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    let sessions = run_scan(state, |options| active_sessions(options, Utc::now())).await;

    Json(SessionsResponse { sessions })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Unknown paths and methods: bare 404
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Run a filesystem scan on the blocking pool. Scans absorb their own errors,
/// so the only failure left is the task itself, which degrades to no data.
async fn run_scan<T, F>(state: Arc<AppState>, scan: F) -> Vec<T>
where
    T: Send + 'static,
    F: FnOnce(&ScanOptions) -> Vec<T> + Send + 'static,
{
    match task::spawn_blocking(move || scan(&state.options)).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Scan task failed: {}", e);
            Vec::new()
        }
    }
}
