//! Outcome types for restore and inspection

use serde::Serialize;

use super::schema::BackupFile;

/// Result of a restore operation
///
/// Restore never raises: systemic failures (decryption, malformed payload,
/// unsupported version) come back with `success == false` and an error
/// message, and individual records that fail to insert are simply not
/// counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreResult {
    pub success: bool,
    pub accounts_restored: usize,
    pub categories_restored: usize,
    pub error: Option<String>,
}

impl RestoreResult {
    /// A completed restore with its tallies
    pub fn completed(accounts_restored: usize, categories_restored: usize) -> Self {
        Self {
            success: true,
            accounts_restored,
            categories_restored,
            error: None,
        }
    }

    /// A restore that aborted before touching storage
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            accounts_restored: 0,
            categories_restored: 0,
            error: Some(error.into()),
        }
    }

    /// Get a one-line summary suitable for showing to the user
    pub fn summary(&self) -> String {
        if self.success {
            format!(
                "Restored {} accounts, {} categories",
                self.accounts_restored, self.categories_restored
            )
        } else {
            self.error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string())
        }
    }
}

/// What a backup contains, read without touching storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSummary {
    pub version: u32,
    pub created_at: i64,
    pub app_version: String,
    pub category_count: usize,
    pub account_count: usize,
    pub sso_hint_count: usize,
    pub password_hint_count: usize,
}

impl BackupSummary {
    pub(crate) fn of(file: &BackupFile) -> Self {
        Self {
            version: file.version,
            created_at: file.created_at,
            app_version: file.app_version.clone(),
            category_count: file.categories.len(),
            account_count: file.accounts.len(),
            sso_hint_count: file.accounts.iter().filter(|a| a.sso_hint.is_some()).count(),
            password_hint_count: file
                .accounts
                .iter()
                .filter(|a| a.password_hint.is_some())
                .count(),
        }
    }

    /// Creation time as a UTC datetime, if the stored millis are in range
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.created_at)
    }

    /// Get a summary of what the backup holds
    pub fn summary(&self) -> String {
        format!(
            "Backup v{} from {}: {} accounts ({} SSO hints, {} password hints), {} categories",
            self.version,
            self.app_version,
            self.account_count,
            self.sso_hint_count,
            self.password_hint_count,
            self.category_count
        )
    }
}
