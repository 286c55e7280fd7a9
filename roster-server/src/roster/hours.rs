//! Hours aggregation
//!
//! Durations are summed as integer millis and converted to hours once,
//! rounded half-up to two decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{ClockEvent, ClockEventKind};
use std::str::FromStr;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const HOURS_SCALE: u32 = 2;

/// How a trailing clock-in without a matching clock-out counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenShiftPolicy {
    /// Ignore the open interval
    #[default]
    Exclude,
    /// Count the time elapsed up to `as_of`
    IncludeElapsed,
}

impl FromStr for OpenShiftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "include_elapsed" | "include-elapsed" => Ok(Self::IncludeElapsed),
            other => Err(format!("unknown open shift policy: {other}")),
        }
    }
}

/// Sum of paired durations in millis.
///
/// `events` must be ordered. Unpaired clock-outs are skipped; the ledger
/// never produces them.
pub fn total_millis(events: &[ClockEvent], as_of: i64, policy: OpenShiftPolicy) -> i64 {
    let mut total: i64 = 0;
    let mut open: Option<i64> = None;

    for event in events {
        match (event.kind, open) {
            (ClockEventKind::ClockIn, None) => open = Some(event.timestamp),
            (ClockEventKind::ClockOut, Some(started)) => {
                total = total.saturating_add(event.timestamp.saturating_sub(started).max(0));
                open = None;
            }
            _ => {}
        }
    }

    if let (Some(started), OpenShiftPolicy::IncludeElapsed) = (open, policy) {
        total = total.saturating_add(as_of.saturating_sub(started).max(0));
    }

    total
}

/// Round half-up and pad to exactly two decimals
fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(HOURS_SCALE);
    rounded
}

/// Millis → hours, 2 decimals, half-up
pub fn millis_to_hours(millis: i64) -> Decimal {
    round_half_up(Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR))
}

/// Total hours worked, as of `as_of`
pub fn total_hours(events: &[ClockEvent], as_of: i64, policy: OpenShiftPolicy) -> Decimal {
    millis_to_hours(total_millis(events, as_of, policy))
}

/// Hours of a single closed shift
pub fn shift_hours(clock_in: i64, clock_out: i64) -> Decimal {
    millis_to_hours(clock_out.saturating_sub(clock_in).max(0))
}

/// hourly_rate × hours, 2 decimals, half-up. Saturates at `Decimal::MAX`.
pub fn earnings(total_hours: Decimal, hourly_rate: Decimal) -> Decimal {
    hourly_rate
        .checked_mul(total_hours)
        .map_or(Decimal::MAX, round_half_up)
}
