//! Data models
//!
//! Shared between roster-server and any presentation layer (via API).
//! Internal ids are `u64`; timestamps are Unix millis (`i64`).

pub mod clock;
pub mod employee;
pub mod roster;

// Re-exports
pub use clock::*;
pub use employee::*;
pub use roster::*;
