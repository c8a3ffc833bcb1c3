//! App settings repository for JSON storage
//!
//! Manages loading and saving the single settings record to settings.json

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{BimilError, BimilResult};
use crate::models::AppSettings;

use super::file_io::{read_json, write_json_atomic};
use super::traits::SettingsStore;

/// Repository for the app settings record
pub struct SettingsRepository {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsRepository {
    /// Create a new settings repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(AppSettings::default()),
        }
    }

    /// Load settings from disk
    pub fn load(&self) -> Result<(), BimilError> {
        let file_data: AppSettings = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;

        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(&self.path, &*data)
    }

    /// Get the current settings
    pub fn get(&self) -> Result<AppSettings, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Replace the settings record and persist it
    pub fn update(&self, settings: AppSettings) -> Result<(), BimilError> {
        {
            let mut data = self.data.write().map_err(|e| {
                BimilError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            *data = settings;
        }

        self.save()
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn read(&self) -> BimilResult<AppSettings> {
        self.get()
    }
}
