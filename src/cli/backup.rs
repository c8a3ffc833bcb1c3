//! Backup CLI commands
//!
//! Implements CLI commands for encrypted backup management.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger};
use crate::backup::{BackupFiles, BackupService};
use crate::config::settings::Settings;
use crate::crypto::SecureString;
use crate::error::{BimilError, BimilResult};
use crate::storage::{write_bytes_atomic, Storage};

/// Environment variable that supplies the backup password non-interactively
pub const PASSWORD_ENV: &str = "BIMIL_BACKUP_PASSWORD";

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new encrypted backup
    Create {
        /// Write the backup here instead of the backup directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Keep existing accounts and add the backup's on top
        #[arg(short, long)]
        merge: bool,

        /// Delete existing accounts first, even when merging is the default
        #[arg(short, long, conflicts_with = "merge")]
        replace: bool,

        /// Confirm replacing all existing accounts
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a backup and show what it contains
    Info {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,
    },

    /// Delete backups beyond the retention limit
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub async fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> BimilResult<()> {
    let paths = storage.paths();
    let files = BackupFiles::new(paths, settings.backup_retention.clone());
    let audit = AuditLogger::new(paths.audit_log());

    match cmd {
        BackupCommands::Create { output } => {
            let password = read_password(true)?;
            let service = backup_service(storage, &audit);

            println!("Creating backup...");
            let blob = service.create_backup(&password).await?;

            let path = match output {
                Some(path) => {
                    write_bytes_atomic(&path, &blob)?;
                    path
                }
                None => {
                    let path = files.write(&blob)?;
                    let pruned = files.enforce_retention()?;
                    if !pruned.is_empty() {
                        audit_or_warn(&audit, AuditEntry::backups_pruned(pruned.len()));
                    }
                    path
                }
            };

            println!("Backup created: {}", display_name(&path));
            println!("Location: {}", path.display());
            println!("Size: {}", format_size(blob.len() as u64));
        }

        BackupCommands::List { verbose } => {
            let backups = files.list()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: bimil backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore {
            backup,
            merge,
            replace,
            force,
        } => {
            let backup_path = files.resolve(&backup)?;
            let merge = restore_mode(merge, replace, settings.merge_by_default);

            if !merge && !force {
                println!("WARNING: This will delete ALL current accounts before restoring!");
                println!("To proceed, run again with --force flag:");
                println!("  bimil backup restore {} --replace --force", backup);
                println!("Or keep existing accounts with --merge.");
                return Ok(());
            }

            let data = files.read(&backup_path)?;
            let password = read_password(false)?;
            let service = backup_service(storage, &audit);

            // Everything is about to be replaced; keep a copy of it first,
            // but only once the backup is known to open
            if !merge {
                service.inspect_backup(&data, &password).await?;
                println!("Creating backup of current data before restore...");
                let safety = files.write(&service.create_backup(&password).await?)?;
                println!("Pre-restore backup saved: {}", display_name(&safety));
                println!();
            }

            println!("Restoring from {}...", display_name(&backup_path));
            let result = service.restore_backup(&data, &password, merge).await;

            if !result.success {
                return Err(BimilError::Backup(result.summary()));
            }

            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let backup_path = files.resolve(&backup)?;
            let data = files.read(&backup_path)?;
            let password = read_password(false)?;

            let summary = backup_service(storage, &audit)
                .inspect_backup(&data, &password)
                .await?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Size: {}", format_size(data.len() as u64));
            match summary.created_at_utc() {
                Some(created) => println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("Created: {} (epoch ms)", summary.created_at),
            }
            println!("Format version: {}", summary.version);
            println!("App version: {}", summary.app_version);
            println!();
            println!("Contents:");
            println!("  Categories:     {}", summary.category_count);
            println!("  Accounts:       {}", summary.account_count);
            println!("  SSO hints:      {}", summary.sso_hint_count);
            println!("  Password hints: {}", summary.password_hint_count);
        }

        BackupCommands::Prune { force } => {
            let backups = files.list()?;
            let excess = files.excess()?;
            let max_backups = settings.backup_retention.max_backups;

            if excess.is_empty() {
                println!("No backups to prune.");
                println!("Current retention policy: keep {} backup(s)", max_backups);
                println!("You have {} backup(s).", backups.len());
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention policy: keep {} backup(s)", max_backups);
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", excess.len());
            for backup in &excess {
                println!("  {}", backup.filename);
            }
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  bimil backup prune --force");
                return Ok(());
            }

            let deleted = files.enforce_retention()?;
            audit_or_warn(&audit, AuditEntry::backups_pruned(deleted.len()));
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Whether a restore merges; an explicit flag beats the configured default
fn restore_mode(merge: bool, replace: bool, merge_by_default: bool) -> bool {
    if replace {
        false
    } else {
        merge || merge_by_default
    }
}

fn backup_service(storage: &Storage, audit: &AuditLogger) -> BackupService {
    BackupService::new(
        storage.settings.clone(),
        storage.categories.clone(),
        storage.accounts.clone(),
    )
    .with_audit(audit.clone())
}

fn audit_or_warn(audit: &AuditLogger, entry: AuditEntry) {
    if let Err(e) = audit.log(&entry) {
        tracing::warn!(error = %e, "failed to write audit entry");
    }
}

/// Read the backup password from the environment, or prompt for it
fn read_password(confirm: bool) -> BimilResult<SecureString> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return non_empty(SecureString::new(password));
    }

    let password = non_empty(prompt_password("Backup password: ")?)?;
    if confirm {
        let again = prompt_password("Confirm password: ")?;
        if password != again {
            return Err(BimilError::Validation("Passwords do not match".into()));
        }
    }

    Ok(password)
}

fn non_empty(password: SecureString) -> BimilResult<SecureString> {
    if password.is_empty() {
        return Err(BimilError::Validation("Password cannot be empty".into()));
    }
    Ok(password)
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> BimilResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| BimilError::Io(format!("Failed to read password: {}", e)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
