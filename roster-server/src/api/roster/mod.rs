//! Roster listing API Module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/roster?q=&page=&per= | GET | search and paginate |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Roster router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/roster", get(handler::list))
}
