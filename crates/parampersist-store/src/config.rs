//! Agent configuration
//!
//! Loaded from a TOML file; every section and key is optional.
//!
//! ```toml
//! [database]
//! path = "params.db"
//! journal_mode = "WAL"
//!
//! [update]
//! insert_new_params = false
//!
//! [logging]
//! profile = "production"
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use parampersist_core::logging_facility::{self, Profile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub database: DatabaseConfig,
    pub update: UpdateConfig,
    pub logging: LoggingConfig,
}

/// Where and how the database is opened
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; an in-memory database is used when absent
    pub path: Option<PathBuf>,
    pub journal_mode: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            journal_mode: "WAL".to_string(),
        }
    }
}

/// Reconciliation behavior of `update`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Insert rows for fields that have no stored counterpart
    pub insert_new_params: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

impl AgentConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the text is not valid TOML or has wrongly typed keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| config_error(&e.to_string()))
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidInput` if it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded agent configuration");
        Ok(config)
    }

    /// Install the logging subscriber for the configured profile
    pub fn init_logging(&self) {
        logging_facility::init(self.logging.profile);
    }
}
