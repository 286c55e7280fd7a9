//! redb-based storage for the employee store and clock ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `employees` | `id` | `Employee` (JSON) | Employee records |
//! | `employee_ids` | `employee_id` | `id` | Unique external id index |
//! | `clock_events` | `(employee_ref, seq)` | `ClockEvent` (JSON) | Ledger (append-only) |
//! | `sequence_counter` | name | `u64` | Employee id and event sequence counters |
//!
//! # Transactions
//!
//! redb admits a single write transaction at a time. Every mutation of the
//! roster runs inside one write transaction, so checks and appends are
//! atomic with respect to each other. Reads use read transactions, which
//! see a consistent snapshot and never wait for writers.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use shared::models::{ClockEvent, Employee};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Employee records: key = id, value = JSON-serialized Employee
const EMPLOYEES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("employees");

/// External id index: key = employee_id, value = id
const EMPLOYEE_IDS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("employee_ids");

/// Ledger: key = (employee_ref, seq), value = JSON-serialized ClockEvent
const CLOCK_EVENTS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("clock_events");

/// Counters: key = counter name, value = last issued value
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const EMPLOYEE_ID_KEY: &str = "employee";
const EVENT_SEQ_KEY: &str = "clock_event";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Point-in-time view of the roster, read in a single transaction
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    /// Ascending by id
    pub employees: Vec<Employee>,
    /// Ledger per employee_ref, ascending by seq
    pub events: HashMap<u64, Vec<ClockEvent>>,
}

impl RosterSnapshot {
    pub fn events_for(&self, employee_ref: u64) -> &[ClockEvent] {
        self.events
            .get(&employee_ref)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Roster storage backed by redb
#[derive(Clone)]
pub struct RosterStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for RosterStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStorage").finish_non_exhaustive()
    }
}

impl RosterStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the data is on disk, and the file is always consistent.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(EMPLOYEES_TABLE)?;
            let _ = write_txn.open_table(EMPLOYEE_IDS_TABLE)?;
            let _ = write_txn.open_table(CLOCK_EVENTS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            for key in [EMPLOYEE_ID_KEY, EVENT_SEQ_KEY] {
                if seq_table.get(key)?.is_none() {
                    seq_table.insert(key, 0u64)?;
                }
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit a write transaction
    pub fn commit(&self, txn: WriteTransaction) -> StorageResult<()> {
        txn.commit()?;
        Ok(())
    }

    // ========== Sequence Operations ==========

    fn increment(&self, txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Issue the next employee id. Ids are never reused, even after delete.
    pub fn next_employee_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.increment(txn, EMPLOYEE_ID_KEY)
    }

    /// Issue the next ledger sequence number
    pub fn next_event_seq(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.increment(txn, EVENT_SEQ_KEY)
    }

    // ========== Employee Operations ==========

    /// Insert or replace an employee record
    pub fn put_employee(&self, txn: &WriteTransaction, employee: &Employee) -> StorageResult<()> {
        let mut table = txn.open_table(EMPLOYEES_TABLE)?;
        let value = serde_json::to_vec(employee)?;
        table.insert(employee.id, value.as_slice())?;
        Ok(())
    }

    /// Get an employee (within transaction)
    pub fn get_employee_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StorageResult<Option<Employee>> {
        let table = txn.open_table(EMPLOYEES_TABLE)?;
        read_employee(&table, id)
    }

    /// Get an employee
    pub fn get_employee(&self, id: u64) -> StorageResult<Option<Employee>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EMPLOYEES_TABLE)?;
        read_employee(&table, id)
    }

    /// All employees (within transaction), ascending by id
    pub fn list_employees_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<Employee>> {
        let table = txn.open_table(EMPLOYEES_TABLE)?;
        read_all_employees(&table)
    }

    /// All employees, ascending by id
    pub fn list_employees(&self) -> StorageResult<Vec<Employee>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EMPLOYEES_TABLE)?;
        read_all_employees(&table)
    }

    /// Remove an employee record. Returns whether it existed.
    pub fn remove_employee(&self, txn: &WriteTransaction, id: u64) -> StorageResult<bool> {
        let mut table = txn.open_table(EMPLOYEES_TABLE)?;
        let existed = table.remove(id)?.is_some();
        Ok(existed)
    }

    // ========== Employee Id Index ==========

    /// Resolve an external employee_id (within transaction)
    pub fn lookup_employee_id_txn(
        &self,
        txn: &WriteTransaction,
        employee_id: &str,
    ) -> StorageResult<Option<u64>> {
        let table = txn.open_table(EMPLOYEE_IDS_TABLE)?;
        Ok(table.get(employee_id)?.map(|guard| guard.value()))
    }

    /// Point an external employee_id at an internal id
    pub fn index_employee_id(
        &self,
        txn: &WriteTransaction,
        employee_id: &str,
        id: u64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(EMPLOYEE_IDS_TABLE)?;
        table.insert(employee_id, id)?;
        Ok(())
    }

    /// Drop an external employee_id from the index
    pub fn unindex_employee_id(
        &self,
        txn: &WriteTransaction,
        employee_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(EMPLOYEE_IDS_TABLE)?;
        table.remove(employee_id)?;
        Ok(())
    }

    // ========== Clock Event Operations ==========

    /// Append an event to the ledger
    pub fn append_event(&self, txn: &WriteTransaction, event: &ClockEvent) -> StorageResult<()> {
        let mut table = txn.open_table(CLOCK_EVENTS_TABLE)?;
        let key = (event.employee_ref, event.seq);
        let value = serde_json::to_vec(event)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Latest event of an employee (within transaction)
    pub fn last_event_txn(
        &self,
        txn: &WriteTransaction,
        employee_ref: u64,
    ) -> StorageResult<Option<ClockEvent>> {
        let table = txn.open_table(CLOCK_EVENTS_TABLE)?;
        let mut range = table.range((employee_ref, 0u64)..=(employee_ref, u64::MAX))?;
        match range.next_back() {
            Some(result) => {
                let (_key, value) = result?;
                Ok(Some(serde_json::from_slice(value.value())?))
            }
            None => Ok(None),
        }
    }

    /// All events of an employee, ascending by seq
    pub fn events_for(&self, employee_ref: u64) -> StorageResult<Vec<ClockEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLOCK_EVENTS_TABLE)?;
        read_events(&table, employee_ref)
    }

    /// Resolve an external employee_id and read its ledger in one read
    /// transaction
    pub fn load_employee_ledger(
        &self,
        employee_id: &str,
    ) -> StorageResult<Option<(Employee, Vec<ClockEvent>)>> {
        let read_txn = self.db.begin_read()?;
        let ids_table = read_txn.open_table(EMPLOYEE_IDS_TABLE)?;
        let Some(id) = ids_table.get(employee_id)?.map(|guard| guard.value()) else {
            return Ok(None);
        };

        let employees_table = read_txn.open_table(EMPLOYEES_TABLE)?;
        let Some(employee) = read_employee(&employees_table, id)? else {
            return Ok(None);
        };

        let events_table = read_txn.open_table(CLOCK_EVENTS_TABLE)?;
        let events = read_events(&events_table, id)?;
        Ok(Some((employee, events)))
    }

    /// Remove every event of an employee. Returns the number removed.
    pub fn remove_events_for(
        &self,
        txn: &WriteTransaction,
        employee_ref: u64,
    ) -> StorageResult<usize> {
        let mut table = txn.open_table(CLOCK_EVENTS_TABLE)?;

        // Collect keys first; the range borrows the table
        let mut keys_to_remove: Vec<u64> = Vec::new();
        for result in table.range((employee_ref, 0u64)..=(employee_ref, u64::MAX))? {
            let (key, _value) = result?;
            keys_to_remove.push(key.value().1);
        }

        for seq in &keys_to_remove {
            table.remove((employee_ref, *seq))?;
        }

        Ok(keys_to_remove.len())
    }

    // ========== Snapshot ==========

    /// Read employees and the whole ledger in one read transaction
    pub fn snapshot(&self) -> StorageResult<RosterSnapshot> {
        let read_txn = self.db.begin_read()?;
        let employees_table = read_txn.open_table(EMPLOYEES_TABLE)?;
        let events_table = read_txn.open_table(CLOCK_EVENTS_TABLE)?;

        let employees = read_all_employees(&employees_table)?;

        let mut events: HashMap<u64, Vec<ClockEvent>> = HashMap::new();
        for result in events_table.iter()? {
            let (_key, value) = result?;
            let event: ClockEvent = serde_json::from_slice(value.value())?;
            events.entry(event.employee_ref).or_default().push(event);
        }

        Ok(RosterSnapshot { employees, events })
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let employees_table = read_txn.open_table(EMPLOYEES_TABLE)?;
        let events_table = read_txn.open_table(CLOCK_EVENTS_TABLE)?;
        let seq_table = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            employee_count: employees_table.len()?,
            event_count: events_table.len()?,
            current_sequence: seq_table
                .get(EVENT_SEQ_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}

fn read_employee(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> StorageResult<Option<Employee>> {
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

fn read_all_employees(
    table: &impl ReadableTable<u64, &'static [u8]>,
) -> StorageResult<Vec<Employee>> {
    let mut employees = Vec::new();
    for result in table.iter()? {
        let (_key, value) = result?;
        employees.push(serde_json::from_slice(value.value())?);
    }
    Ok(employees)
}

fn read_events(
    table: &impl ReadableTable<(u64, u64), &'static [u8]>,
    employee_ref: u64,
) -> StorageResult<Vec<ClockEvent>> {
    let mut events = Vec::new();
    for result in table.range((employee_ref, 0u64)..=(employee_ref, u64::MAX))? {
        let (_key, value) = result?;
        events.push(serde_json::from_slice(value.value())?);
    }
    Ok(events)
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub employee_count: u64,
    pub event_count: u64,
    pub current_sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ClockEventKind;

    fn create_test_employee(id: u64, employee_id: &str) -> Employee {
        Employee {
            id,
            employee_id: employee_id.to_string(),
            name: format!("Employee {}", id),
            phone: "555-0100".to_string(),
            hourly_rate: Decimal::new(1500, 2),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn create_test_event(employee_ref: u64, seq: u64, kind: ClockEventKind) -> ClockEvent {
        ClockEvent {
            seq,
            employee_ref,
            employee_id: format!("E{}", employee_ref),
            kind,
            timestamp: seq as i64 * 1000,
        }
    }

    #[test]
    fn test_sequence_counters_are_independent() {
        let storage = RosterStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_employee_id(&txn).unwrap(), 1);
        assert_eq!(storage.next_employee_id(&txn).unwrap(), 2);
        assert_eq!(storage.next_event_seq(&txn).unwrap(), 1);
        storage.commit(txn).unwrap();

        assert_eq!(storage.get_stats().unwrap().current_sequence, 1);
    }

    #[test]
    fn test_employee_storage_and_index() {
        let storage = RosterStorage::open_in_memory().unwrap();
        let employee = create_test_employee(1, "E1");

        let txn = storage.begin_write().unwrap();
        storage.put_employee(&txn, &employee).unwrap();
        storage.index_employee_id(&txn, "E1", 1).unwrap();
        storage.commit(txn).unwrap();

        assert_eq!(storage.get_employee(1).unwrap(), Some(employee));

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.lookup_employee_id_txn(&txn, "E1").unwrap(), Some(1));
        assert_eq!(storage.lookup_employee_id_txn(&txn, "E2").unwrap(), None);
        assert!(storage.remove_employee(&txn, 1).unwrap());
        assert!(!storage.remove_employee(&txn, 1).unwrap());
        storage.unindex_employee_id(&txn, "E1").unwrap();
        storage.commit(txn).unwrap();

        assert!(storage.get_employee(1).unwrap().is_none());
        let txn = storage.begin_write().unwrap();
        assert!(storage.lookup_employee_id_txn(&txn, "E1").unwrap().is_none());
    }

    #[test]
    fn test_uncommitted_write_is_discarded() {
        let storage = RosterStorage::open_in_memory().unwrap();

        {
            let txn = storage.begin_write().unwrap();
            storage
                .put_employee(&txn, &create_test_employee(1, "E1"))
                .unwrap();
            // dropped without commit
        }

        assert!(storage.list_employees().unwrap().is_empty());
    }

    #[test]
    fn test_events_are_scoped_per_employee() {
        let storage = RosterStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .append_event(&txn, &create_test_event(1, 1, ClockEventKind::ClockIn))
            .unwrap();
        storage
            .append_event(&txn, &create_test_event(2, 2, ClockEventKind::ClockIn))
            .unwrap();
        storage
            .append_event(&txn, &create_test_event(1, 3, ClockEventKind::ClockOut))
            .unwrap();

        let last = storage.last_event_txn(&txn, 1).unwrap().unwrap();
        assert_eq!(last.seq, 3);
        assert!(storage.last_event_txn(&txn, 9).unwrap().is_none());
        storage.commit(txn).unwrap();

        let events = storage.events_for(1).unwrap();
        assert_eq!(
            events.iter().map(|e| e.seq).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(storage.events_for(2).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_events_for() {
        let storage = RosterStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        for seq in 1..=4 {
            let kind = if seq % 2 == 1 {
                ClockEventKind::ClockIn
            } else {
                ClockEventKind::ClockOut
            };
            storage
                .append_event(&txn, &create_test_event(1, seq, kind))
                .unwrap();
        }
        storage
            .append_event(&txn, &create_test_event(2, 5, ClockEventKind::ClockIn))
            .unwrap();
        assert_eq!(storage.remove_events_for(&txn, 1).unwrap(), 4);
        storage.commit(txn).unwrap();

        assert!(storage.events_for(1).unwrap().is_empty());
        assert_eq!(storage.events_for(2).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_groups_events() {
        let storage = RosterStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .put_employee(&txn, &create_test_employee(2, "E2"))
            .unwrap();
        storage
            .put_employee(&txn, &create_test_employee(1, "E1"))
            .unwrap();
        storage
            .append_event(&txn, &create_test_event(1, 1, ClockEventKind::ClockIn))
            .unwrap();
        storage
            .append_event(&txn, &create_test_event(1, 2, ClockEventKind::ClockOut))
            .unwrap();
        storage.commit(txn).unwrap();

        let snapshot = storage.snapshot().unwrap();
        assert_eq!(
            snapshot.employees.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(snapshot.events_for(1).len(), 2);
        assert!(snapshot.events_for(2).is_empty());

        let stats = storage.get_stats().unwrap();
        assert_eq!(stats.employee_count, 2);
        assert_eq!(stats.event_count, 2);
    }

    #[test]
    fn test_reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.redb");

        {
            let storage = RosterStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            let id = storage.next_employee_id(&txn).unwrap();
            storage
                .put_employee(&txn, &create_test_employee(id, "E1"))
                .unwrap();
            storage.commit(txn).unwrap();
        }

        let storage = RosterStorage::open(&path).unwrap();
        assert_eq!(storage.list_employees().unwrap().len(), 1);

        let txn = storage.begin_write().unwrap();
        // the counter survives the reopen
        assert_eq!(storage.next_employee_id(&txn).unwrap(), 2);
    }
}
