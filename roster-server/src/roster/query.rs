//! Roster query engine
//!
//! Filter, order and slice over one storage snapshot. Derived values
//! (hours, clock state, earnings) are computed per query.

use shared::models::{Employee, RosterItem, RosterPage};

use super::error::{RosterError, RosterResult};
use super::hours::{self, OpenShiftPolicy};
use super::ledger;
use crate::storage::RosterSnapshot;

/// Case-insensitive substring match on employee_id, name or phone.
///
/// `needle` must already be trimmed and lowercased; empty matches all.
pub fn matches(employee: &Employee, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&employee.employee_id, &employee.name, &employee.phone]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Build one roster page, newest employees first
pub fn run(
    snapshot: &RosterSnapshot,
    search: &str,
    page: u32,
    per_page: u32,
    as_of: i64,
    policy: OpenShiftPolicy,
) -> RosterResult<RosterPage> {
    if page == 0 {
        return Err(RosterError::validation("page must be at least 1"));
    }
    if per_page == 0 {
        return Err(RosterError::validation("per_page must be at least 1"));
    }

    let needle = search.trim().to_lowercase();
    let mut matched: Vec<&Employee> = snapshot
        .employees
        .iter()
        .filter(|employee| matches(employee, &needle))
        .collect();
    matched.sort_by(|a, b| b.id.cmp(&a.id));

    let total = matched.len() as u64;
    let offset = (page as usize - 1).saturating_mul(per_page as usize);

    let items = matched
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .map(|employee| {
            let events = snapshot.events_for(employee.id);
            let total_hours = hours::total_hours(events, as_of, policy);
            RosterItem {
                clocked_in: ledger::clock_state(events).is_in(),
                earnings: hours::earnings(total_hours, employee.hourly_rate),
                total_hours,
                employee: employee.clone(),
            }
        })
        .collect();

    Ok(RosterPage::new(items, total, page, per_page))
}
