//! Utilities shared across the server
//!
//! - [`AppError`] / [`AppResult`] (from shared::error)
//! - logging setup
//! - time sources
//! - input validation

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};

use axum::Json;

/// Wrap data in a success envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Wrap data in a success envelope with a custom message
pub fn ok_with_message<T>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
