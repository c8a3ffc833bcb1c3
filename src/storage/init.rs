//! Storage initialization
//!
//! Handles first-run setup and default data creation

use tracing::info;

use crate::config::paths::BimilPaths;
use crate::error::BimilError;
use crate::models::{AppSettings, Category};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Writes the default settings record and the built-in categories. Files
/// that already exist are left alone.
pub fn initialize_storage(paths: &BimilPaths) -> Result<(), BimilError> {
    paths.ensure_directories()?;

    if !paths.app_settings_file().exists() {
        write_json_atomic(paths.app_settings_file(), &AppSettings::default())?;
        info!(path = %paths.app_settings_file().display(), "created default settings");
    }

    if !paths.categories_file().exists() {
        let data = CategoryData {
            categories: Category::defaults(),
        };
        write_json_atomic(paths.categories_file(), &data)?;
        info!(count = data.categories.len(), "seeded default categories");
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BimilPaths) -> bool {
    !paths.app_settings_file().exists() || !paths.categories_file().exists()
}
