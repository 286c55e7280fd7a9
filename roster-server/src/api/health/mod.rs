//! Health check route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | liveness and storage counters |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::storage::StorageStats;
use crate::utils::{ApiResponse, AppResult, ok};

/// Health router
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    version: &'static str,
    environment: String,
    storage: StorageStats,
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<HealthResponse>>> {
    let storage = state.roster.stats()?;
    Ok(ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        storage,
    }))
}
