//! Backup service
//!
//! Gathers the whole store into a versioned payload and encrypts it, and
//! plays an encrypted payload back into the store. Restore is best-effort:
//! once the payload has been decrypted and parsed, each category and each
//! account is inserted on its own and a failure only skips that record.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::audit::{AuditEntry, AuditLogger};
use crate::crypto;
use crate::error::{BimilError, BimilResult};
use crate::models::{AccountWithHint, AppSettings, Category, LoginType};
use crate::storage::{AccountStore, CategoryStore, SettingsStore};

use super::restore::{BackupSummary, RestoreResult};
use super::schema::{BackupFile, APP_VERSION, BACKUP_VERSION};
use super::serializer;

/// Creates and restores encrypted backups against a set of stores
pub struct BackupService {
    settings: Arc<dyn SettingsStore>,
    categories: Arc<dyn CategoryStore>,
    accounts: Arc<dyn AccountStore>,
    app_version: String,
    audit: Option<AuditLogger>,
}

impl BackupService {
    /// Create a service over the given stores
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        categories: Arc<dyn CategoryStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            settings,
            categories,
            accounts,
            app_version: APP_VERSION.to_string(),
            audit: None,
        }
    }

    /// Override the version string written into new backups
    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = app_version.into();
        self
    }

    /// Record backup and restore events in an audit log
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Read everything a backup contains from the stores
    ///
    /// Any store failure aborts the whole read.
    pub async fn collect(&self) -> BimilResult<(AppSettings, Vec<Category>, Vec<AccountWithHint>)> {
        let settings = self.settings.read().await?;
        let categories = self.categories.read_all().await?;
        let accounts = self.accounts.read_all().await?;

        let mut with_hints = Vec::with_capacity(accounts.len());
        for account in accounts {
            let sso_hint = self.accounts.read_sso_hint(&account.id).await?;
            let password_hint = self.accounts.read_password_hint(&account.id).await?;
            with_hints.push(AccountWithHint {
                account,
                sso_hint,
                password_hint,
            });
        }

        debug!(
            categories = categories.len(),
            accounts = with_hints.len(),
            "collected store contents"
        );
        Ok((settings, categories, with_hints))
    }

    /// Produce an encrypted backup of the whole store
    pub async fn create_backup(&self, password: &str) -> BimilResult<Vec<u8>> {
        let (settings, categories, accounts) = self.collect().await?;

        let mut file = serializer::serialize(&settings, &categories, &accounts);
        file.app_version = self.app_version.clone();

        let plaintext = Zeroizing::new(serializer::to_bytes(&file)?);
        let password = Zeroizing::new(password.to_string());
        let blob = run_blocking(move || crypto::encrypt(&plaintext, &password)).await?;

        info!(
            accounts = file.accounts.len(),
            categories = file.categories.len(),
            bytes = blob.len(),
            "backup created"
        );
        self.record(AuditEntry::backup_created(
            file.accounts.len(),
            file.categories.len(),
        ));

        Ok(blob)
    }

    /// Play an encrypted backup back into the store
    ///
    /// With `merge == false` every existing account is deleted first.
    /// Categories are never deleted. This never returns an error: failures
    /// are reported through the result.
    pub async fn restore_backup(&self, data: &[u8], password: &str, merge: bool) -> RestoreResult {
        let file = match self.open(data, password).await {
            Ok(file) => file,
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "restore aborted");
                self.record(AuditEntry::restore_failed(merge, message.clone()));
                return RestoreResult::failed(message);
            }
        };

        let decoded = serializer::deserialize(&file);
        let total_accounts = decoded.accounts.len();

        if !merge {
            if let Err(e) = self.accounts.delete_all().await {
                let message = e.to_string();
                warn!(error = %message, "could not clear accounts before restore");
                self.record(AuditEntry::restore_failed(merge, message.clone()));
                return RestoreResult::failed(message);
            }
            debug!("cleared existing accounts");
        }

        let mut categories_restored = 0;
        for category in decoded.categories {
            let id = category.id.clone();
            match self.categories.insert(category).await {
                Ok(()) => categories_restored += 1,
                Err(e) => debug!(category = %id, error = %e, "category skipped"),
            }
        }

        let mut accounts_restored = 0;
        for (index, entry) in decoded.accounts.into_iter().enumerate() {
            let outcome = match entry {
                Ok(entry) => self.restore_account(entry).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => accounts_restored += 1,
                Err(e) => warn!(index, error = %e, "account skipped"),
            }
        }

        info!(
            merge,
            accounts_restored,
            categories_restored,
            accounts_skipped = total_accounts - accounts_restored,
            "restore completed"
        );
        self.record(AuditEntry::restore_completed(
            merge,
            accounts_restored,
            categories_restored,
            total_accounts - accounts_restored,
        ));

        RestoreResult::completed(accounts_restored, categories_restored)
    }

    /// Decrypt and parse a backup without touching the store
    pub async fn inspect_backup(&self, data: &[u8], password: &str) -> BimilResult<BackupSummary> {
        let file = self.open(data, password).await?;
        Ok(BackupSummary::of(&file))
    }

    /// Decrypt, parse and version-check a payload
    async fn open(&self, data: &[u8], password: &str) -> BimilResult<BackupFile> {
        let data = data.to_vec();
        let password = Zeroizing::new(password.to_string());
        let plaintext =
            Zeroizing::new(run_blocking(move || crypto::decrypt(&data, &password)).await?);

        let file = serializer::from_bytes(&plaintext)?;
        if file.version != BACKUP_VERSION {
            return Err(BimilError::Backup(format!(
                "Unsupported backup version: {}",
                file.version
            )));
        }

        Ok(file)
    }

    /// Insert one account and the hint matching its login type
    ///
    /// A failed hint insert leaves the account row in place.
    async fn restore_account(&self, entry: AccountWithHint) -> BimilResult<()> {
        if entry.has_mismatched_hint() {
            warn!(
                account = %entry.account.id,
                login_type = %entry.account.login_type,
                "backup carries a hint that does not match the login type; ignoring it"
            );
        }

        let AccountWithHint {
            account,
            sso_hint,
            password_hint,
        } = entry;
        let login_type = account.login_type;

        self.accounts.insert(account).await?;

        match login_type {
            LoginType::Sso => {
                if let Some(hint) = sso_hint {
                    self.accounts.insert_sso_hint(hint).await?;
                }
            }
            LoginType::Password => {
                if let Some(hint) = password_hint {
                    self.accounts.insert_password_hint(hint).await?;
                }
            }
        }

        Ok(())
    }

    fn record(&self, entry: AuditEntry) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }
    }
}

/// Run CPU-bound crypto off the async executor
async fn run_blocking<T, F>(f: F) -> BimilResult<T>
where
    F: FnOnce() -> BimilResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BimilError::Encryption(format!("Crypto task failed: {}", e)))?
}
