//! Employee Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// System-assigned id, never reused
    pub id: u64,
    /// User-supplied external identifier, unique among active employees
    pub employee_id: String,
    pub name: String,
    pub phone: String,
    /// Pay rate, always scale 2
    pub hourly_rate: Decimal,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub name: String,
    pub phone: String,
    pub hourly_rate: Decimal,
}

/// Update employee payload (absent fields are left unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

impl EmployeeUpdate {
    /// True when the payload changes nothing
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.hourly_rate.is_none()
    }
}

/// Bulk purge payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePurge {
    /// employee_id prefix, e.g. "EMP" for test fixtures
    pub prefix: String,
}

/// Bulk purge result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeResult {
    pub removed_employees: usize,
    pub removed_events: usize,
}
