//! Path management for Bimil
//!
//! Provides XDG-compliant path resolution for configuration, data, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `BIMIL_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/bimil` or `~/.config/bimil`
//! 3. Windows: `%APPDATA%\bimil`

use std::path::PathBuf;

use crate::error::BimilError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BIMIL_DATA_DIR";

/// Manages all paths used by Bimil
#[derive(Debug, Clone)]
pub struct BimilPaths {
    /// Base directory for all Bimil data
    base_dir: PathBuf,
}

impl BimilPaths {
    /// Create a new BimilPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home or app-data directory can be determined.
    pub fn new() -> Result<Self, BimilError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BimilPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/bimil/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/bimil/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (~/.config/bimil/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the tool configuration file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the app settings record
    pub fn app_settings_file(&self) -> PathBuf {
        self.data_dir().join("settings.json")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to accounts.json (accounts and their hints)
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BimilError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BimilError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BimilError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| BimilError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the store has been initialized (app settings exist)
    pub fn is_initialized(&self) -> bool {
        self.app_settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BimilError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("bimil"));
        }
    }

    let home = std::env::var("HOME")
        .map_err(|_| BimilError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("bimil"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BimilError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BimilError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("bimil"))
}
