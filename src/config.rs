//! Configuration management for the SFD ledger host

use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Database path that selects the in-memory world state.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, LedgerError> {
        self.level
            .parse()
            .map_err(|_| LedgerError::ConfigError(format!("unknown log level {:?}", self.level)))
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Config = if s.trim().is_empty() {
            Config::default()
        } else {
            toml::from_str(s)?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.database.path.is_empty() {
            return Err(LedgerError::ConfigError(
                "database.path must be set in config.toml".to_string(),
            ));
        }
        self.logging.max_level()?;
        Ok(())
    }
}

/// Loads `config.toml` from the working directory, falling back to defaults when absent.
pub fn load_config() -> Result<Config, LedgerError> {
    let config_str = fs::read_to_string(DEFAULT_CONFIG_FILE).unwrap_or_default();
    Config::from_toml_str(&config_str)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, LedgerError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|e| {
        LedgerError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Config::from_toml_str(&config_str)
}

fn default_db_path() -> String {
    "./data/ledger.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
