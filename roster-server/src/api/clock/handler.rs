//! Time Clock API Handlers
//!
//! Timestamps are assigned by the server; requests never carry one.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{
    ClockAction, ClockEvent, ClockReceipt, ClockRequest, ClockState, HoursSummary,
};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// Record a clock-in or clock-out
pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<ClockRequest>,
) -> AppResult<Json<ApiResponse<ClockReceipt>>> {
    let receipt = state.roster.clock(&payload.employee_id, payload.action)?;
    let message = match payload.action {
        ClockAction::ClockIn => "Clocked in",
        ClockAction::ClockOut => "Clocked out",
    };
    Ok(ok_with_message(message, receipt))
}

/// Current clock state
pub async fn current_state(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<ApiResponse<ClockState>>> {
    let clock_state = state.roster.clock_state(&employee_id)?;
    Ok(ok(clock_state))
}

/// Ledger of one employee
pub async fn events(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<ClockEvent>>>> {
    let events = state.roster.events_for(&employee_id)?;
    Ok(ok(events))
}

#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    /// Unix millis; defaults to now
    pub as_of: Option<i64>,
}

/// Total hours worked
pub async fn hours(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
    Query(query): Query<HoursQuery>,
) -> AppResult<Json<ApiResponse<HoursSummary>>> {
    let summary = state.roster.total_hours(&employee_id, query.as_of)?;
    Ok(ok(summary))
}
