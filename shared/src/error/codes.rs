//! Unified error codes for the roster service
//!
//! Error codes are shared between the server and any presentation layer.
//! They are organized by category:
//! - 0xxx: General errors
//! - 80xx-81xx: Employee errors
//! - 82xx-89xx: Clock errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 8xxx: Employee ====================
    /// Employee not found (by internal id)
    EmployeeNotFound = 8001,
    /// External employee_id already used by an active employee
    EmployeeIdExists = 8002,

    // ==================== 82xx: Clock ====================
    /// Clock operation against an employee_id with no active employee
    UnknownEmployee = 8201,
    /// Employee already has an open clock-in
    AlreadyClockedIn = 8202,
    /// Employee has no open clock-in to close
    NotClockedIn = 8203,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Out of memory
    OutOfMemory = 9402,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeIdExists => "Employee ID already exists",

            // Clock
            ErrorCode::UnknownEmployee => "No active employee with this employee ID",
            ErrorCode::AlreadyClockedIn => "Employee is already clocked in",
            ErrorCode::NotClockedIn => "No clock-in found to clock out",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",

            // Storage
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::OutOfMemory => "Out of memory",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeIdExists),

            // Clock
            8201 => Ok(ErrorCode::UnknownEmployee),
            8202 => Ok(ErrorCode::AlreadyClockedIn),
            8203 => Ok(ErrorCode::NotClockedIn),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            // Storage
            9401 => Ok(ErrorCode::StorageFull),
            9402 => Ok(ErrorCode::OutOfMemory),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);

        assert_eq!(ErrorCode::EmployeeNotFound.code(), 8001);
        assert_eq!(ErrorCode::EmployeeIdExists.code(), 8002);

        assert_eq!(ErrorCode::UnknownEmployee.code(), 8201);
        assert_eq!(ErrorCode::AlreadyClockedIn.code(), 8202);
        assert_eq!(ErrorCode::NotClockedIn.code(), 8203);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::StorageFull.code(), 9401);
    }

    #[test]
    fn test_try_from_roundtrips_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::EmployeeNotFound,
            ErrorCode::EmployeeIdExists,
            ErrorCode::UnknownEmployee,
            ErrorCode::AlreadyClockedIn,
            ErrorCode::NotClockedIn,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::StorageFull,
            ErrorCode::OutOfMemory,
            ErrorCode::StorageCorrupted,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::AlreadyClockedIn).unwrap();
        assert_eq!(json, "8202");

        let code: ErrorCode = serde_json::from_str("8203").unwrap();
        assert_eq!(code, ErrorCode::NotClockedIn);

        assert!(serde_json::from_str::<ErrorCode>("7777").is_err());
    }
}
