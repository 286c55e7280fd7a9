//! Roster API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::RosterPage;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

/// Roster query parameters
///
/// Kept as raw strings: bad values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub per: Option<String>,
}

impl RosterQuery {
    /// `page`: unparseable or below 1 becomes 1
    pub fn page(&self) -> u32 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    /// `per`: unparseable or below 1 becomes the default, capped at `max`
    pub fn per_page(&self, default: u32, max: u32) -> u32 {
        parse_positive(self.per.as_deref())
            .unwrap_or(default)
            .min(max)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Search and paginate the roster
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RosterQuery>,
) -> AppResult<Json<ApiResponse<RosterPage>>> {
    let config = &state.config;
    let page = state.roster.list_roster(
        query.q.as_deref().unwrap_or(""),
        query.page(),
        query.per_page(config.default_per_page, config.max_per_page),
    )?;
    Ok(ok(page))
}
