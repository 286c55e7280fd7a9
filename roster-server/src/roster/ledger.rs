//! Clock ledger state machine
//!
//! Per employee: `Out --ClockIn--> In --ClockOut--> Out`, starting at `Out`.
//! The state is never stored; it is the kind of the latest event.

use redb::WriteTransaction;
use shared::models::{ClockEvent, ClockEventKind, ClockState, Employee};

use super::error::{RosterError, RosterResult};
use crate::storage::RosterStorage;

/// State implied by the latest event
pub fn state_after(last: Option<&ClockEvent>) -> ClockState {
    match last {
        Some(event) if event.kind == ClockEventKind::ClockIn => ClockState::In {
            since: event.timestamp,
        },
        _ => ClockState::Out,
    }
}

/// State of an ordered ledger
pub fn clock_state(events: &[ClockEvent]) -> ClockState {
    state_after(events.last())
}

/// Check a transition. Returns the open clock-in timestamp when the
/// transition closes a shift.
pub fn transition(
    state: ClockState,
    kind: ClockEventKind,
    employee_id: &str,
) -> RosterResult<Option<i64>> {
    match (state, kind) {
        (ClockState::Out, ClockEventKind::ClockIn) => Ok(None),
        (ClockState::In { since }, ClockEventKind::ClockOut) => Ok(Some(since)),
        (ClockState::In { .. }, ClockEventKind::ClockIn) => {
            Err(RosterError::AlreadyClockedIn(employee_id.to_string()))
        }
        (ClockState::Out, ClockEventKind::ClockOut) => {
            Err(RosterError::NotClockedIn(employee_id.to_string()))
        }
    }
}

/// An appended event and, for a clock-out, the clock-in it closed
#[derive(Debug, Clone)]
pub struct Recorded {
    pub event: ClockEvent,
    pub opened_at: Option<i64>,
}

/// Validate and append an event inside the caller's write transaction.
///
/// The timestamp is clamped so it never precedes the employee's latest
/// event.
pub fn record(
    storage: &RosterStorage,
    txn: &WriteTransaction,
    employee: &Employee,
    kind: ClockEventKind,
    now: i64,
) -> RosterResult<Recorded> {
    let last = storage.last_event_txn(txn, employee.id)?;
    let opened_at = transition(state_after(last.as_ref()), kind, &employee.employee_id)?;

    let timestamp = last.as_ref().map_or(now, |event| now.max(event.timestamp));
    let event = ClockEvent {
        seq: storage.next_event_seq(txn)?,
        employee_ref: employee.id,
        employee_id: employee.employee_id.clone(),
        kind,
        timestamp,
    };
    storage.append_event(txn, &event)?;

    Ok(Recorded { event, opened_at })
}
