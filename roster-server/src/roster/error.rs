//! Roster error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by roster operations
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(String),

    #[error("Employee id already exists: {0}")]
    DuplicateEmployeeId(String),

    #[error("Employee not found: {0}")]
    NotFound(u64),

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Employee {0} is already clocked in")]
    AlreadyClockedIn(String),

    #[error("Employee {0} is not clocked in")]
    NotClockedIn(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RosterResult<T> = Result<T, RosterError>;

impl RosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Map a storage failure onto a system error code
///
/// redb reports I/O conditions through its error text, so those are
/// matched by message.
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if let StorageError::Serialization(_) = e {
        return ErrorCode::InternalError;
    }

    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return ErrorCode::OutOfMemory;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::DatabaseError
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Validation(msg) => AppError::validation(msg),
            RosterError::DuplicateEmployeeId(employee_id) => AppError::with_message(
                ErrorCode::EmployeeIdExists,
                format!("Employee id already exists: {}", employee_id),
            )
            .with_detail("employee_id", employee_id),
            RosterError::NotFound(id) => AppError::with_message(
                ErrorCode::EmployeeNotFound,
                format!("Employee not found: {}", id),
            )
            .with_detail("id", id),
            RosterError::UnknownEmployee(employee_id) => AppError::with_message(
                ErrorCode::UnknownEmployee,
                format!("Unknown employee: {}", employee_id),
            )
            .with_detail("employee_id", employee_id),
            RosterError::AlreadyClockedIn(employee_id) => {
                AppError::new(ErrorCode::AlreadyClockedIn).with_detail("employee_id", employee_id)
            }
            RosterError::NotClockedIn(employee_id) => {
                AppError::new(ErrorCode::NotClockedIn).with_detail("employee_id", employee_id)
            }
            RosterError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                AppError::with_message(code, e.to_string())
            }
        }
    }
}
