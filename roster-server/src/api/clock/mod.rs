//! Time Clock API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Clock router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::record))
        .route("/{employee_id}", get(handler::current_state))
        .route("/{employee_id}/events", get(handler::events))
        .route("/{employee_id}/hours", get(handler::hours))
}
