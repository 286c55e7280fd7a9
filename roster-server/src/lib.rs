//! Roster Server - employee roster and time clock
//!
//! # Module layout
//!
//! ```text
//! roster-server/src/
//! ├── core/          # config, state, server
//! ├── storage.rs     # redb tables
//! ├── roster/        # employee store, clock ledger, hours, roster query
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, time sources, validation
//! ```

pub mod api;
pub mod core;
pub mod roster;
pub mod storage;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use roster::{
    HistoryOnDelete, OpenShiftPolicy, RosterError, RosterResult, RosterService, RosterSettings,
};
pub use storage::{RosterStorage, StorageError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env` and initialize logging from the environment
pub fn setup_environment() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenv::dotenv();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("ENVIRONMENT").is_ok_and(|env| env == "production");
    let log_dir = std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty());

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&level), json, log_dir.as_deref());
    Ok(())
}
