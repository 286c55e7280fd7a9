//! Roster service
//!
//! Owns the employee store and clock ledger. Every mutation runs in one
//! redb write transaction; an early return drops the transaction, which
//! discards any partial writes.
//!
//! # Usage
//!
//! ```ignore
//! let service = RosterService::new(storage, Arc::new(SystemTimeSource), RosterSettings::default());
//! let employee = service.add_employee(payload)?;
//! service.clock_in(&employee.employee_id)?;
//! let page = service.list_roster("", 1, 10)?;
//! ```

pub mod employees;
pub mod error;
pub mod hours;
pub mod ledger;
pub mod query;

use std::str::FromStr;
use std::sync::Arc;

use shared::models::{
    ClockAction, ClockEvent, ClockEventKind, ClockReceipt, ClockState, Employee, EmployeeCreate,
    EmployeeUpdate, HoursSummary, PurgeResult, RosterPage,
};

use crate::storage::{RosterStorage, StorageStats};
use crate::utils::TimeSource;

pub use error::{RosterError, RosterResult};
pub use hours::OpenShiftPolicy;

/// What happens to an employee's clock history when the employee is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryOnDelete {
    /// Remove the events with the employee
    #[default]
    Purge,
    /// Keep the events; they stay bound to the deleted internal id
    Retain,
}

impl FromStr for HistoryOnDelete {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purge" => Ok(Self::Purge),
            "retain" => Ok(Self::Retain),
            other => Err(format!("unknown clock history policy: {other}")),
        }
    }
}

/// Behavioural settings
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterSettings {
    pub open_shift_policy: OpenShiftPolicy,
    pub history_on_delete: HistoryOnDelete,
}

/// Employee roster and time clock
pub struct RosterService {
    storage: RosterStorage,
    clock: Arc<dyn TimeSource>,
    settings: RosterSettings,
}

impl std::fmt::Debug for RosterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RosterService {
    pub fn new(storage: RosterStorage, clock: Arc<dyn TimeSource>, settings: RosterSettings) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    pub fn storage(&self) -> &RosterStorage {
        &self.storage
    }

    fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    // ========== Employees ==========

    pub fn add_employee(&self, payload: EmployeeCreate) -> RosterResult<Employee> {
        let payload = employees::normalize_create(payload)?;

        let txn = self.storage.begin_write()?;
        let employee = employees::insert(&self.storage, &txn, payload, self.now())?;
        self.storage.commit(txn)?;

        tracing::info!(
            id = employee.id,
            employee_id = %employee.employee_id,
            "Employee added"
        );
        Ok(employee)
    }

    pub fn update_employee(&self, id: u64, update: EmployeeUpdate) -> RosterResult<Employee> {
        if update.is_empty() {
            return self.get_employee(id);
        }
        let update = employees::normalize_update(update)?;

        let txn = self.storage.begin_write()?;
        let employee = employees::apply_update(&self.storage, &txn, id, update, self.now())?;
        self.storage.commit(txn)?;

        tracing::info!(id, employee_id = %employee.employee_id, "Employee updated");
        Ok(employee)
    }

    /// Delete an employee. Clock history follows `history_on_delete`.
    pub fn delete_employee(&self, id: u64) -> RosterResult<()> {
        let txn = self.storage.begin_write()?;
        let employee = employees::remove(&self.storage, &txn, id)?;
        let removed_events = match self.settings.history_on_delete {
            HistoryOnDelete::Purge => self.storage.remove_events_for(&txn, id)?,
            HistoryOnDelete::Retain => 0,
        };
        self.storage.commit(txn)?;

        tracing::info!(
            id,
            employee_id = %employee.employee_id,
            removed_events,
            "Employee deleted"
        );
        Ok(())
    }

    pub fn get_employee(&self, id: u64) -> RosterResult<Employee> {
        self.storage
            .get_employee(id)?
            .ok_or(RosterError::NotFound(id))
    }

    /// All employees, ascending by id
    pub fn list_employees(&self) -> RosterResult<Vec<Employee>> {
        Ok(self.storage.list_employees()?)
    }

    /// Delete every employee whose employee_id starts with `prefix` (ASCII
    /// case-insensitive), together with their clock history. Used to clear
    /// fixture data.
    pub fn purge_by_prefix(&self, prefix: &str) -> RosterResult<PurgeResult> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(RosterError::validation("prefix must not be empty"));
        }

        let txn = self.storage.begin_write()?;
        let mut result = PurgeResult {
            removed_employees: 0,
            removed_events: 0,
        };
        for employee in self.storage.list_employees_txn(&txn)? {
            let matches = employee
                .employee_id
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if !matches {
                continue;
            }
            employees::remove(&self.storage, &txn, employee.id)?;
            result.removed_events += self.storage.remove_events_for(&txn, employee.id)?;
            result.removed_employees += 1;
        }
        self.storage.commit(txn)?;

        tracing::info!(
            prefix,
            removed_employees = result.removed_employees,
            removed_events = result.removed_events,
            "Employees purged"
        );
        Ok(result)
    }

    // ========== Clock ==========

    pub fn clock_in(&self, employee_id: &str) -> RosterResult<ClockReceipt> {
        self.record(employee_id, ClockEventKind::ClockIn)
    }

    pub fn clock_out(&self, employee_id: &str) -> RosterResult<ClockReceipt> {
        self.record(employee_id, ClockEventKind::ClockOut)
    }

    pub fn clock(&self, employee_id: &str, action: ClockAction) -> RosterResult<ClockReceipt> {
        match action {
            ClockAction::ClockIn => self.clock_in(employee_id),
            ClockAction::ClockOut => self.clock_out(employee_id),
        }
    }

    fn record(&self, employee_id: &str, kind: ClockEventKind) -> RosterResult<ClockReceipt> {
        let employee_id = employee_id.trim();

        let txn = self.storage.begin_write()?;
        let employee = self
            .storage
            .lookup_employee_id_txn(&txn, employee_id)?
            .map(|id| self.storage.get_employee_txn(&txn, id))
            .transpose()?
            .flatten()
            .ok_or_else(|| RosterError::UnknownEmployee(employee_id.to_string()))?;

        let recorded = match ledger::record(&self.storage, &txn, &employee, kind, self.now()) {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::warn!(
                    employee_id,
                    action = kind.as_str(),
                    error = %e,
                    "Clock transition rejected"
                );
                return Err(e);
            }
        };
        self.storage.commit(txn)?;

        let shift_hours = recorded
            .opened_at
            .map(|opened_at| hours::shift_hours(opened_at, recorded.event.timestamp));

        tracing::info!(
            employee_id,
            action = kind.as_str(),
            seq = recorded.event.seq,
            at = %shared::util::millis_to_rfc3339(recorded.event.timestamp),
            "Clock event recorded"
        );

        Ok(ClockReceipt {
            event: recorded.event,
            shift_hours,
        })
    }

    fn load_ledger(&self, employee_id: &str) -> RosterResult<(Employee, Vec<ClockEvent>)> {
        let employee_id = employee_id.trim();
        self.storage
            .load_employee_ledger(employee_id)?
            .ok_or_else(|| RosterError::UnknownEmployee(employee_id.to_string()))
    }

    /// Ledger of an employee, ordered by timestamp then seq
    pub fn events_for(&self, employee_id: &str) -> RosterResult<Vec<ClockEvent>> {
        let (_, events) = self.load_ledger(employee_id)?;
        Ok(events)
    }

    pub fn clock_state(&self, employee_id: &str) -> RosterResult<ClockState> {
        let (_, events) = self.load_ledger(employee_id)?;
        Ok(ledger::clock_state(&events))
    }

    /// Hours worked up to `as_of` (default: now)
    pub fn total_hours(&self, employee_id: &str, as_of: Option<i64>) -> RosterResult<HoursSummary> {
        if as_of.is_some_and(|t| t < 0) {
            return Err(RosterError::validation("as_of must not be negative"));
        }
        let (employee, events) = self.load_ledger(employee_id)?;
        let as_of = as_of.unwrap_or_else(|| self.now());
        let total_hours = hours::total_hours(&events, as_of, self.settings.open_shift_policy);

        Ok(HoursSummary {
            employee_id: employee.employee_id,
            total_hours,
            as_of,
            state: ledger::clock_state(&events),
            earnings: hours::earnings(total_hours, employee.hourly_rate),
        })
    }

    // ========== Roster ==========

    /// One page of the roster, newest employees first
    pub fn list_roster(&self, search: &str, page: u32, per_page: u32) -> RosterResult<RosterPage> {
        let snapshot = self.storage.snapshot()?;
        query::run(
            &snapshot,
            search,
            page,
            per_page,
            self.now(),
            self.settings.open_shift_policy,
        )
    }

    pub fn stats(&self) -> RosterResult<StorageStats> {
        Ok(self.storage.get_stats()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualTimeSource;
    use rust_decimal::Decimal;

    const HOUR: i64 = 3_600_000;

    fn service_with(settings: RosterSettings) -> (RosterService, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(0));
        let storage = RosterStorage::open_in_memory().unwrap();
        (RosterService::new(storage, clock.clone(), settings), clock)
    }

    fn service() -> (RosterService, Arc<ManualTimeSource>) {
        service_with(RosterSettings::default())
    }

    fn payload(employee_id: &str, name: &str, phone: &str) -> EmployeeCreate {
        EmployeeCreate {
            employee_id: employee_id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            hourly_rate: Decimal::new(1550, 2),
        }
    }

    #[test]
    fn test_clock_scenario() {
        let (svc, clock) = service();
        svc.add_employee(payload("E1", "Ann", "555-0101")).unwrap();

        let receipt = svc.clock_in("E1").unwrap();
        assert_eq!(receipt.event.timestamp, 0);
        assert!(receipt.shift_hours.is_none());

        assert!(matches!(
            svc.clock_in("E1"),
            Err(RosterError::AlreadyClockedIn(_))
        ));

        clock.advance_secs(3600);
        let receipt = svc.clock_out("E1").unwrap();
        assert_eq!(receipt.shift_hours, Some(Decimal::new(100, 2)));

        let summary = svc.total_hours("E1", None).unwrap();
        assert_eq!(summary.total_hours, Decimal::new(100, 2));
        assert_eq!(summary.earnings, Decimal::new(1550, 2));
        assert_eq!(summary.state, ClockState::Out);
    }

    #[test]
    fn test_clock_unknown_and_not_clocked_in() {
        let (svc, _) = service();
        assert!(matches!(
            svc.clock_in("NOPE"),
            Err(RosterError::UnknownEmployee(_))
        ));
        assert!(matches!(
            svc.events_for("NOPE"),
            Err(RosterError::UnknownEmployee(_))
        ));

        svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        assert!(matches!(
            svc.clock_out("E1"),
            Err(RosterError::NotClockedIn(_))
        ));
        assert!(svc.events_for("E1").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_employee_id() {
        let (svc, _) = service();
        svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        assert!(matches!(
            svc.add_employee(payload(" E1 ", "Bob", "556")),
            Err(RosterError::DuplicateEmployeeId(_))
        ));
        assert_eq!(svc.list_employees().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_leaves_store_unchanged() {
        let (svc, _) = service();
        svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        let before = svc.list_employees().unwrap();

        assert!(matches!(
            svc.delete_employee(99),
            Err(RosterError::NotFound(99))
        ));
        assert_eq!(svc.list_employees().unwrap(), before);
    }

    #[test]
    fn test_update_rejects_invalid_and_missing() {
        let (svc, clock) = service();
        let emp = svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        clock.advance(HOUR);

        let bad_phone = EmployeeUpdate {
            phone: Some("ext. 12".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_employee(emp.id, bad_phone),
            Err(RosterError::Validation(_))
        ));
        assert_eq!(svc.get_employee(emp.id).unwrap(), emp);

        let rename = EmployeeUpdate {
            name: Some("Ann Lee".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_employee(99, rename.clone()),
            Err(RosterError::NotFound(99))
        ));
        assert!(matches!(
            svc.update_employee(99, EmployeeUpdate::default()),
            Err(RosterError::NotFound(99))
        ));

        let updated = svc.update_employee(emp.id, rename).unwrap();
        assert_eq!(updated.name, "Ann Lee");
        assert_eq!(updated.updated_at, HOUR);
    }

    #[test]
    fn test_delete_purges_history() {
        let (svc, clock) = service();
        let emp = svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        svc.clock_in("E1").unwrap();
        clock.advance(HOUR);
        svc.clock_out("E1").unwrap();

        svc.delete_employee(emp.id).unwrap();
        assert!(svc.storage().events_for(emp.id).unwrap().is_empty());
        assert!(matches!(
            svc.get_employee(emp.id),
            Err(RosterError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_retains_history_but_reused_id_starts_empty() {
        let (svc, clock) = service_with(RosterSettings {
            history_on_delete: HistoryOnDelete::Retain,
            ..Default::default()
        });
        let emp = svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        svc.clock_in("E1").unwrap();
        clock.advance(HOUR);
        svc.clock_out("E1").unwrap();

        svc.delete_employee(emp.id).unwrap();
        assert_eq!(svc.storage().events_for(emp.id).unwrap().len(), 2);

        let again = svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        assert_ne!(again.id, emp.id);
        assert!(svc.events_for("E1").unwrap().is_empty());
        assert_eq!(
            svc.total_hours("E1", None).unwrap().total_hours,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_rename_carries_history() {
        let (svc, clock) = service();
        let emp = svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        svc.clock_in("E1").unwrap();
        clock.advance(HOUR);

        svc.update_employee(
            emp.id,
            EmployeeUpdate {
                employee_id: Some("E2".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(matches!(
            svc.clock_out("E1"),
            Err(RosterError::UnknownEmployee(_))
        ));
        svc.clock_out("E2").unwrap();
        assert_eq!(
            svc.total_hours("E2", None).unwrap().total_hours,
            Decimal::new(100, 2)
        );
    }

    #[test]
    fn test_open_shift_policy_setting() {
        let (svc, clock) = service_with(RosterSettings {
            open_shift_policy: OpenShiftPolicy::IncludeElapsed,
            ..Default::default()
        });
        svc.add_employee(payload("E1", "Ann", "555")).unwrap();
        svc.clock_in("E1").unwrap();
        clock.advance(HOUR / 2);

        let summary = svc.total_hours("E1", None).unwrap();
        assert_eq!(summary.total_hours, Decimal::new(50, 2));
        assert_eq!(summary.state, ClockState::In { since: 0 });

        // pinned as_of
        let summary = svc.total_hours("E1", Some(HOUR)).unwrap();
        assert_eq!(summary.total_hours, Decimal::new(100, 2));

        assert!(matches!(
            svc.total_hours("E1", Some(-5)),
            Err(RosterError::Validation(_))
        ));
        let summary = svc.total_hours("E1", Some(i64::MAX)).unwrap();
        assert!(summary.total_hours > Decimal::ZERO);

        let page = svc.list_roster("", 1, 10).unwrap();
        assert!(page.items[0].clocked_in);
        assert_eq!(page.items[0].total_hours, Decimal::new(50, 2));
    }

    #[test]
    fn test_added_employee_is_searchable() {
        let (svc, _) = service();
        svc.add_employee(payload("E1", "Ann Lee", "555-0101")).unwrap();
        svc.add_employee(payload("E2", "Bob Ray", "444-0101")).unwrap();

        let page = svc.list_roster("ann", 1, 10).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].employee.employee_id, "E1");

        let page = svc.list_roster("Ann Lee", 1, 10).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].employee.employee_id, "E1");

        let page = svc.list_roster("555", 1, 10).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_purge_by_prefix() {
        let (svc, clock) = service_with(RosterSettings {
            history_on_delete: HistoryOnDelete::Retain,
            ..Default::default()
        });
        svc.add_employee(payload("EMP001", "Test One", "555")).unwrap();
        svc.add_employee(payload("EMP002", "Test Two", "555")).unwrap();
        svc.add_employee(payload("X1", "Keep", "555")).unwrap();
        svc.clock_in("EMP001").unwrap();
        clock.advance(HOUR);
        svc.clock_out("EMP001").unwrap();

        let result = svc.purge_by_prefix("emp").unwrap();
        assert_eq!(result.removed_employees, 2);
        assert_eq!(result.removed_events, 2);

        let remaining = svc.list_employees().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].employee_id, "X1");
        assert_eq!(svc.stats().unwrap().event_count, 0);

        assert!(matches!(
            svc.purge_by_prefix("  "),
            Err(RosterError::Validation(_))
        ));
    }

    #[test]
    fn test_history_policy_from_str() {
        assert_eq!("Purge".parse::<HistoryOnDelete>(), Ok(HistoryOnDelete::Purge));
        assert_eq!("retain".parse::<HistoryOnDelete>(), Ok(HistoryOnDelete::Retain));
        assert!("keep".parse::<HistoryOnDelete>().is_err());
    }
}
