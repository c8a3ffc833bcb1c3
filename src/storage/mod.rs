//! Storage layer for Bimil
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation, plus the store traits the backup service is written against.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod settings;
pub mod traits;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use init::initialize_storage;
pub use settings::SettingsRepository;
pub use traits::{AccountStore, CategoryStore, SettingsStore};

use std::sync::Arc;

use crate::config::paths::BimilPaths;
use crate::error::BimilError;

/// Main storage coordinator that provides access to all repositories
///
/// Repositories are shared behind `Arc` so they can be handed to the
/// backup service as trait objects.
pub struct Storage {
    paths: BimilPaths,
    pub settings: Arc<SettingsRepository>,
    pub categories: Arc<CategoryRepository>,
    pub accounts: Arc<AccountRepository>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BimilPaths) -> Result<Self, BimilError> {
        paths.ensure_directories()?;

        Ok(Self {
            settings: Arc::new(SettingsRepository::new(paths.app_settings_file())),
            categories: Arc::new(CategoryRepository::new(paths.categories_file())),
            accounts: Arc::new(AccountRepository::new(paths.accounts_file())),
            paths,
        })
    }

    /// Create and load a Storage instance in one step
    pub fn open(paths: BimilPaths) -> Result<Self, BimilError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BimilPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BimilError> {
        self.settings.load()?;
        self.categories.load()?;
        self.accounts.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BimilError> {
        self.settings.save()?;
        self.categories.save()?;
        self.accounts.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
