use std::path::PathBuf;
use std::str::FromStr;

use crate::roster::{HistoryOnDelete, OpenShiftPolicy, RosterSettings};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database and log root |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | (unset) | enables daily rolling log files |
/// | REQUEST_TIMEOUT_MS | 30000 | request timeout (ms) |
/// | DEFAULT_PER_PAGE | 10 | roster page size when not requested |
/// | MAX_PER_PAGE | 100 | roster page size cap |
/// | OPEN_SHIFT_POLICY | exclude | `exclude` / `include_elapsed` |
/// | CLOCK_HISTORY_ON_DELETE | purge | `purge` / `retain` |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/roster HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory; the database lives under `database/`
    pub work_dir: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub default_per_page: u32,
    pub max_per_page: u32,
    pub open_shift_policy: OpenShiftPolicy,
    pub history_on_delete: HistoryOnDelete,
}

/// Read and parse an env var, warning and falling back on bad input
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Invalid configuration value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from the environment, with defaults for unset values
    pub fn from_env() -> Self {
        let default_per_page = env_or("DEFAULT_PER_PAGE", 10u32).max(1);
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty()),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            default_per_page,
            max_per_page: env_or("MAX_PER_PAGE", 100u32).max(default_per_page),
            open_shift_policy: env_or("OPEN_SHIFT_POLICY", OpenShiftPolicy::default()),
            history_on_delete: env_or("CLOCK_HISTORY_ON_DELETE", HistoryOnDelete::default()),
        }
    }

    /// Override work dir and port, for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("roster.redb")
    }

    pub fn roster_settings(&self) -> RosterSettings {
        RosterSettings {
            open_shift_policy: self.open_shift_policy,
            history_on_delete: self.history_on_delete,
        }
    }

    /// Create the work directory layout
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/roster-test", 4000);
        assert_eq!(config.http_port, 4000);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/roster-test/database/roster.redb")
        );
        assert!(config.max_per_page >= config.default_per_page);
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("ROSTER_TEST_UNSET_VARIABLE", 7u32), 7);
    }
}
