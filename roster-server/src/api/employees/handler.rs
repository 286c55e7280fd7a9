//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Employee, EmployeeCreate, EmployeePurge, EmployeeUpdate, PurgeResult};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// List all employees, ascending by id
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Employee>>>> {
    let employees = state.roster.list_employees()?;
    Ok(ok(employees))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let employee = state.roster.get_employee(id)?;
    Ok(ok(employee))
}

/// Create a new employee
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let employee = state.roster.add_employee(payload)?;
    Ok(ok_with_message("Employee added", employee))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let employee = state.roster.update_employee(id, payload)?;
    Ok(ok_with_message("Employee updated", employee))
}

/// Delete an employee
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.roster.delete_employee(id)?;
    Ok(Json(ApiResponse::ok()))
}

/// Delete every employee whose employee_id starts with a prefix
pub async fn purge(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeePurge>,
) -> AppResult<Json<ApiResponse<PurgeResult>>> {
    let result = state.roster.purge_by_prefix(&payload.prefix)?;
    Ok(ok(result))
}
