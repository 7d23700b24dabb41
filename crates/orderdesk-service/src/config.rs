//! Service configuration.
//!
//! Loaded from environment variables with fallback to defaults.
//!
//! | Variable                            | Default            |
//! |-------------------------------------|--------------------|
//! | `ORDERDESK_DATABASE_PATH`           | `./orderdesk.db`   |
//! | `ORDERDESK_DB_MAX_CONNECTIONS`      | `5`                |
//! | `ORDERDESK_DB_CONNECT_TIMEOUT_SECS` | `30`               |
//! | `ORDERDESK_LOG_FILTER`              | `info,orderdesk=debug,sqlx=warn` |
//! | `ORDERDESK_MAX_REPORT_LIMIT`        | `100`              |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use orderdesk_db::DbConfig;

pub const DEFAULT_LOG_FILTER: &str = "info,orderdesk=debug,sqlx=warn";

/// Runtime configuration for the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Connection acquire timeout in seconds
    pub db_connect_timeout_secs: u64,

    /// Filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Upper bound for report `limit` arguments
    pub max_report_limit: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_path: PathBuf::from("./orderdesk.db"),
            db_max_connections: 5,
            db_connect_timeout_secs: 30,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            max_report_limit: 100,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            database_path: lookup("ORDERDESK_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                &lookup,
                "ORDERDESK_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            db_connect_timeout_secs: parse_or(
                &lookup,
                "ORDERDESK_DB_CONNECT_TIMEOUT_SECS",
                defaults.db_connect_timeout_secs,
            )?,

            log_filter: lookup("ORDERDESK_LOG_FILTER").unwrap_or(defaults.log_filter),

            max_report_limit: parse_or(
                &lookup,
                "ORDERDESK_MAX_REPORT_LIMIT",
                defaults.max_report_limit,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "ORDERDESK_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.max_report_limit < 1 {
            return Err(ConfigError::InvalidValue(
                "ORDERDESK_MAX_REPORT_LIMIT".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
