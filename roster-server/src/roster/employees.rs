//! Employee store operations
//!
//! All functions run inside the caller's write transaction. The
//! `employee_ids` index is kept in step with the `employees` table.

use redb::WriteTransaction;
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

use super::error::{RosterError, RosterResult};
use crate::storage::RosterStorage;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_hourly_rate, validate_phone,
    validate_required_text,
};

/// Validate a create payload and return it trimmed and normalized
pub fn normalize_create(payload: EmployeeCreate) -> RosterResult<EmployeeCreate> {
    validate_required_text(&payload.employee_id, "employee_id", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_phone(&payload.phone)?;
    let hourly_rate = validate_hourly_rate(payload.hourly_rate)?;

    Ok(EmployeeCreate {
        employee_id: payload.employee_id.trim().to_string(),
        name: payload.name.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        hourly_rate,
    })
}

/// Validate the present fields of an update payload
pub fn normalize_update(payload: EmployeeUpdate) -> RosterResult<EmployeeUpdate> {
    if let Some(employee_id) = &payload.employee_id {
        validate_required_text(employee_id, "employee_id", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_phone(phone)?;
    }
    let hourly_rate = payload.hourly_rate.map(validate_hourly_rate).transpose()?;

    Ok(EmployeeUpdate {
        employee_id: payload.employee_id.map(|s| s.trim().to_string()),
        name: payload.name.map(|s| s.trim().to_string()),
        phone: payload.phone.map(|s| s.trim().to_string()),
        hourly_rate,
    })
}

/// Insert a new employee. `payload` must already be normalized.
pub fn insert(
    storage: &RosterStorage,
    txn: &WriteTransaction,
    payload: EmployeeCreate,
    now: i64,
) -> RosterResult<Employee> {
    if storage
        .lookup_employee_id_txn(txn, &payload.employee_id)?
        .is_some()
    {
        return Err(RosterError::DuplicateEmployeeId(payload.employee_id));
    }

    let employee = Employee {
        id: storage.next_employee_id(txn)?,
        employee_id: payload.employee_id,
        name: payload.name,
        phone: payload.phone,
        hourly_rate: payload.hourly_rate,
        created_at: now,
        updated_at: now,
    };

    storage.put_employee(txn, &employee)?;
    storage.index_employee_id(txn, &employee.employee_id, employee.id)?;
    Ok(employee)
}

/// Apply a normalized partial update
pub fn apply_update(
    storage: &RosterStorage,
    txn: &WriteTransaction,
    id: u64,
    update: EmployeeUpdate,
    now: i64,
) -> RosterResult<Employee> {
    let mut employee = storage
        .get_employee_txn(txn, id)?
        .ok_or(RosterError::NotFound(id))?;

    if let Some(new_id) = update.employee_id
        && new_id != employee.employee_id
    {
        if let Some(owner) = storage.lookup_employee_id_txn(txn, &new_id)?
            && owner != id
        {
            return Err(RosterError::DuplicateEmployeeId(new_id));
        }
        storage.unindex_employee_id(txn, &employee.employee_id)?;
        storage.index_employee_id(txn, &new_id, id)?;
        employee.employee_id = new_id;
    }
    if let Some(name) = update.name {
        employee.name = name;
    }
    if let Some(phone) = update.phone {
        employee.phone = phone;
    }
    if let Some(hourly_rate) = update.hourly_rate {
        employee.hourly_rate = hourly_rate;
    }
    employee.updated_at = now;

    storage.put_employee(txn, &employee)?;
    Ok(employee)
}

/// Remove an employee record and its index entry
pub fn remove(
    storage: &RosterStorage,
    txn: &WriteTransaction,
    id: u64,
) -> RosterResult<Employee> {
    let employee = storage
        .get_employee_txn(txn, id)?
        .ok_or(RosterError::NotFound(id))?;
    storage.remove_employee(txn, id)?;
    storage.unindex_employee_id(txn, &employee.employee_id)?;
    Ok(employee)
}
