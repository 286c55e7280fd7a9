//! Clock Ledger Models
//!
//! Clock events are append-only. Timestamps are Unix millis assigned by the
//! server when the event is recorded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Clock event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockEventKind {
    ClockIn,
    ClockOut,
}

impl ClockEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockEventKind::ClockIn => "clock_in",
            ClockEventKind::ClockOut => "clock_out",
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEvent {
    /// Global sequence, strictly increasing across the ledger
    pub seq: u64,
    /// Internal id of the owning employee
    pub employee_ref: u64,
    /// External employee_id at the time of the event
    pub employee_id: String,
    pub kind: ClockEventKind,
    /// Unix millis, server-assigned
    pub timestamp: i64,
}

/// Current position of an employee in the clock state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClockState {
    Out,
    In {
        /// Timestamp of the open clock-in
        since: i64,
    },
}

impl ClockState {
    pub fn is_in(&self) -> bool {
        matches!(self, ClockState::In { .. })
    }
}

/// Clock action requested through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    ClockIn,
    ClockOut,
}

/// Clock request payload (the server assigns the timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    pub employee_id: String,
    pub action: ClockAction,
}

/// Result of a clock operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockReceipt {
    pub event: ClockEvent,
    /// Hours of the shift closed by a clock-out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_hours: Option<Decimal>,
}

/// Hours aggregate for one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursSummary {
    pub employee_id: String,
    pub total_hours: Decimal,
    /// Unix millis the total was computed for
    pub as_of: i64,
    pub state: ClockState,
    pub earnings: Decimal,
}
