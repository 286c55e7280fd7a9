//! Input validation helpers
//!
//! Text length limits and field checks for employee payloads.

use rust_decimal::Decimal;

use crate::roster::{RosterError, RosterResult};

// ── Text length limits ──────────────────────────────────────────────

/// Person names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: employee_id, phone
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Decimal places kept for money values
pub const MONEY_SCALE: u32 = 2;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty (after trimming) and
/// within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> RosterResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RosterError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(RosterError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Phone numbers: digits plus `+ - ( )` and spaces
pub fn validate_phone(value: &str) -> RosterResult<()> {
    validate_required_text(value, "phone", MAX_SHORT_TEXT_LEN)?;
    let value = value.trim();
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(RosterError::validation(format!(
            "phone contains invalid characters: {value}"
        )));
    }
    Ok(())
}

/// Hourly rate: non-negative, at most two decimal places.
///
/// Returns the rate normalized to scale 2.
pub fn validate_hourly_rate(rate: Decimal) -> RosterResult<Decimal> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(RosterError::validation(format!(
            "hourly_rate must not be negative: {rate}"
        )));
    }
    let normalized = rate.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(RosterError::validation(format!(
            "hourly_rate has more than {MONEY_SCALE} decimal places: {rate}"
        )));
    }
    let mut rescaled = normalized;
    rescaled.rescale(MONEY_SCALE);
    Ok(rescaled)
}
