//! Audit entry data structures
//!
//! Defines the backup events that are audited and the entry format itself.
//! Entries carry counts and file names only, never passwords or payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of backup events that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    BackupCreated,
    RestoreCompleted,
    RestoreFailed,
    BackupsPruned,
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEvent::BackupCreated => write!(f, "BACKUP"),
            AuditEvent::RestoreCompleted => write!(f, "RESTORE"),
            AuditEvent::RestoreFailed => write!(f, "RESTORE FAILED"),
            AuditEvent::BackupsPruned => write!(f, "PRUNE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub event: AuditEvent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<usize>,

    /// Accounts present in the backup but not restored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,

    /// Backup files deleted by a prune
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,

    /// Backup file involved, when the caller knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    fn new(event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            merge: None,
            accounts: None,
            categories: None,
            skipped: None,
            removed: None,
            file: None,
            error: None,
        }
    }

    /// A backup was produced
    pub fn backup_created(accounts: usize, categories: usize) -> Self {
        Self {
            accounts: Some(accounts),
            categories: Some(categories),
            ..Self::new(AuditEvent::BackupCreated)
        }
    }

    /// A restore ran to completion
    pub fn restore_completed(
        merge: bool,
        accounts_restored: usize,
        categories_restored: usize,
        accounts_skipped: usize,
    ) -> Self {
        Self {
            merge: Some(merge),
            accounts: Some(accounts_restored),
            categories: Some(categories_restored),
            skipped: Some(accounts_skipped),
            ..Self::new(AuditEvent::RestoreCompleted)
        }
    }

    /// A restore aborted before touching storage
    pub fn restore_failed(merge: bool, error: impl Into<String>) -> Self {
        Self {
            merge: Some(merge),
            error: Some(error.into()),
            ..Self::new(AuditEvent::RestoreFailed)
        }
    }

    /// Old backup files were deleted
    pub fn backups_pruned(count: usize) -> Self {
        Self {
            removed: Some(count),
            ..Self::new(AuditEvent::BackupsPruned)
        }
    }

    /// Attach the backup file name
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.event
        );

        if let Some(file) = &self.file {
            output.push_str(&format!(" {}", file));
        }

        match self.event {
            AuditEvent::BackupCreated | AuditEvent::RestoreCompleted => {
                output.push_str(&format!(
                    " ({} accounts, {} categories)",
                    self.accounts.unwrap_or(0),
                    self.categories.unwrap_or(0)
                ));
            }
            AuditEvent::BackupsPruned => {
                output.push_str(&format!(" ({} removed)", self.removed.unwrap_or(0)));
            }
            AuditEvent::RestoreFailed => {}
        }

        if self.merge == Some(true) {
            output.push_str(" [merge]");
        }

        if let Some(error) = &self.error {
            output.push_str(&format!("\n  Error: {}", error));
        }

        output
    }
}
