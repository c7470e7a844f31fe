//! Path management for Moneta
//!
//! Resolves where configuration, the audit log and the ledger files live.
//!
//! ## Path Resolution Order
//!
//! 1. `MONETA_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/moneta` on Linux,
//!    `~/Library/Application Support/moneta` on macOS, `%APPDATA%\moneta` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::MonetaError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MONETA_DATA_DIR";

/// Manages all paths used by Moneta
#[derive(Debug, Clone)]
pub struct MonetaPaths {
    /// Base directory for all Moneta data
    base_dir: PathBuf,
}

impl MonetaPaths {
    /// Create a new MonetaPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, MonetaError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create MonetaPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), MonetaError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MonetaError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MonetaError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Moneta has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, MonetaError> {
    ProjectDirs::from("", "", "moneta")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            MonetaError::Config(format!(
                "Could not determine a home directory; set {} instead",
                DATA_DIR_ENV
            ))
        })
}
