//! Path management for lodge-dues
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `LODGE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/lodge-dues` or `~/.config/lodge-dues`
//! 3. Windows: `%APPDATA%\lodge-dues`

use std::path::PathBuf;

use crate::error::LodgeError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "LODGE_DATA_DIR";

/// Manages all paths used by lodge-dues
#[derive(Debug, Clone)]
pub struct LodgePaths {
    /// Base directory for all lodge-dues data
    base_dir: PathBuf,
}

impl LodgePaths {
    /// Create a new LodgePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LodgeError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LodgePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/lodge-dues/data/)
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

    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.json")
    }

    pub fn dues_file(&self) -> PathBuf {
        self.data_dir().join("dues.json")
    }

    pub fn receipt_counters_file(&self) -> PathBuf {
        self.data_dir().join("receipt_counters.json")
    }

    pub fn fees_file(&self) -> PathBuf {
        self.data_dir().join("fees.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LodgeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LodgeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LodgeError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if lodge-dues has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LodgeError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                LodgeError::Config(format!(
                    "HOME is not set; set {} to choose a data directory",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("lodge-dues"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LodgeError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LodgeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("lodge-dues"))
}
