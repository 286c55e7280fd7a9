use std::sync::Arc;

use anyhow::Context;

use super::config::Config;
use crate::roster::{RosterService, RosterSettings};
use crate::storage::RosterStorage;
use crate::utils::{SystemTimeSource, TimeSource};

/// State shared by every request handler
///
/// Cloning is cheap; the roster service is behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub roster: Arc<RosterService>,
}

impl ServerState {
    pub fn new(config: Config, roster: Arc<RosterService>) -> Self {
        Self { config, roster }
    }

    /// Initialize the server state
    ///
    /// 1. Work directory structure
    /// 2. Database (work_dir/database/roster.redb)
    /// 3. Roster service with the wall clock
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        config
            .ensure_work_dir_structure()
            .context("Failed to create work directory structure")?;

        let db_path = config.database_path();
        let storage = RosterStorage::open(&db_path)
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let roster = RosterService::new(
            storage,
            Arc::new(SystemTimeSource),
            config.roster_settings(),
        );
        Ok(Self::new(config.clone(), Arc::new(roster)))
    }

    /// State over an in-memory database with the given time source
    pub fn in_memory(
        config: Config,
        clock: Arc<dyn TimeSource>,
        settings: RosterSettings,
    ) -> anyhow::Result<Self> {
        let storage = RosterStorage::open_in_memory().context("Failed to open in-memory database")?;
        let roster = RosterService::new(storage, clock, settings);
        Ok(Self::new(config, Arc::new(roster)))
    }
}
