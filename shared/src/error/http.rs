//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::EmployeeNotFound | Self::UnknownEmployee => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::EmployeeIdExists | Self::AlreadyClockedIn | Self::NotClockedIn => {
                StatusCode::CONFLICT
            }

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageFull
            | Self::OutOfMemory
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
        }
    }
}
