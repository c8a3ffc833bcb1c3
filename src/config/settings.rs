//! Tool settings for Bimil
//!
//! Preferences for the command-line tool itself: how many backup files to
//! keep, the default restore policy and the log filter. These are separate
//! from the app settings record that lives in the store and gets exported.

use serde::{Deserialize, Serialize};

use super::paths::BimilPaths;
use crate::error::BimilError;

/// Backup retention settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of backup files to keep in the backup directory
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            max_backups: default_max_backups(),
        }
    }
}

/// Tool settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Merge into existing accounts when `--merge` is not given
    #[serde(default)]
    pub merge_by_default: bool,

    /// `tracing` filter used when BIMIL_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_backups() -> u32 {
    10
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            merge_by_default: false,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BimilPaths) -> Result<Self, BimilError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BimilError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BimilError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BimilPaths) -> Result<(), BimilError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BimilError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BimilError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
