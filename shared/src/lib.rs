//! Shared types for the roster service
//!
//! Error codes, response envelope and the employee / clock / roster models
//! used by the server and its API consumers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
