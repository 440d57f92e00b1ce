//! Store configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

fn default_busy_timeout_seconds() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    5
}

/// Configuration for the shared `SQLite` handle, parsed from TOML.
///
/// The handle is threaded through construction explicitly — there is no
/// process-wide implicit connection.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Path of the database file. Parent directories are created on connect.
    pub database_path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_seconds")]
    pub busy_timeout_seconds: u64,
    /// Upper bound on pooled connections to the shared handle.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StoreConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and
    /// `AppError::Config` if parsing or validation fails.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| AppError::Io(format!("cannot read config {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Busy timeout as a [`Duration`].
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(AppError::Config("database_path must not be empty".into()));
        }
        if self.max_connections == 0 {
            return Err(AppError::Config("max_connections must be at least 1".into()));
        }
        Ok(())
    }
}
