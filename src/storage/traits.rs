//! Store traits consumed by the backup service
//!
//! These are the only operations backup and restore need from storage.
//! The JSON repositories in this module implement them; tests substitute
//! their own.

use async_trait::async_trait;

use crate::error::BimilResult;
use crate::models::{AccountEntry, AccountId, AppSettings, Category, PasswordHint, SsoHint};

/// Access to the single app settings record
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the settings record (always present once initialized)
    async fn read(&self) -> BimilResult<AppSettings>;
}

/// Access to categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Get all categories in display order
    async fn read_all(&self) -> BimilResult<Vec<Category>>;

    /// Insert a category; fails if the id already exists
    async fn insert(&self, category: Category) -> BimilResult<()>;
}

/// Access to accounts and their hints
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get all accounts
    async fn read_all(&self) -> BimilResult<Vec<AccountEntry>>;

    /// Insert an account; fails if the id already exists
    async fn insert(&self, account: AccountEntry) -> BimilResult<()>;

    /// Delete every account together with its hints
    async fn delete_all(&self) -> BimilResult<()>;

    async fn read_sso_hint(&self, account_id: &AccountId) -> BimilResult<Option<SsoHint>>;

    async fn insert_sso_hint(&self, hint: SsoHint) -> BimilResult<()>;

    async fn read_password_hint(&self, account_id: &AccountId)
        -> BimilResult<Option<PasswordHint>>;

    async fn insert_password_hint(&self, hint: PasswordHint) -> BimilResult<()>;
}
