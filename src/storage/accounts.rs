//! Account repository for JSON storage
//!
//! Manages loading and saving accounts and their hints to accounts.json.
//! Hints live in the same file so that deleting accounts and their hints
//! is a single atomic write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{BimilError, BimilResult};
use crate::models::{AccountEntry, AccountId, AccountWithHint, HintId, PasswordHint, SsoHint};

use super::file_io::{read_json, write_json_atomic};
use super::traits::AccountStore;

/// Serializable account data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<AccountEntry>,
    #[serde(default)]
    sso_hints: Vec<SsoHint>,
    #[serde(default)]
    password_hints: Vec<PasswordHint>,
}

/// In-memory tables
#[derive(Default)]
struct Tables {
    accounts: HashMap<AccountId, AccountEntry>,
    sso_hints: HashMap<HintId, SsoHint>,
    password_hints: HashMap<HintId, PasswordHint>,
}

/// Repository for account and hint persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<Tables>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Tables::default()),
        }
    }

    /// Load accounts and hints from disk
    pub fn load(&self) -> Result<(), BimilError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = Tables::default();
        for account in file_data.accounts {
            data.accounts.insert(account.id.clone(), account);
        }
        for hint in file_data.sso_hints {
            data.sso_hints.insert(hint.id.clone(), hint);
        }
        for hint in file_data.password_hints {
            data.password_hints.insert(hint.id.clone(), hint);
        }

        Ok(())
    }

    /// Save accounts and hints to disk
    pub fn save(&self) -> Result<(), BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        self.persist(&data)
    }

    fn persist(&self, data: &Tables) -> Result<(), BimilError> {
        let mut sso_hints: Vec<_> = data.sso_hints.values().cloned().collect();
        sso_hints.sort_by(|a, b| a.id.cmp(&b.id));
        let mut password_hints: Vec<_> = data.password_hints.values().cloned().collect();
        password_hints.sort_by(|a, b| a.id.cmp(&b.id));

        let file_data = AccountData {
            accounts: sorted_accounts(&data.accounts),
            sso_hints,
            password_hints,
        };

        write_json_atomic(&self.path, &file_data)
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, Tables>, BimilError> {
        self.data
            .write()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Get an account by ID
    pub fn get(&self, id: &AccountId) -> Result<Option<AccountEntry>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.accounts.get(id).cloned())
    }

    /// Get all accounts ordered by service name (case-insensitive)
    pub fn get_all(&self) -> Result<Vec<AccountEntry>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted_accounts(&data.accounts))
    }

    /// Get an account together with its hints
    pub fn get_with_hint(&self, id: &AccountId) -> Result<Option<AccountWithHint>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.accounts.get(id).map(|account| AccountWithHint {
            account: account.clone(),
            sso_hint: data
                .sso_hints
                .values()
                .find(|h| &h.account_id == id)
                .cloned(),
            password_hint: data
                .password_hints
                .values()
                .find(|h| &h.account_id == id)
                .cloned(),
        }))
    }

    /// Validate a new account, then insert and persist it
    pub fn create(&self, account: AccountEntry) -> Result<(), BimilError> {
        account
            .validate()
            .map_err(|e| BimilError::Validation(e.to_string()))?;

        self.insert_record(account)
    }

    /// Insert an account as-is; fails only on an id collision or a write error
    ///
    /// The in-memory table only changes once the file has been written.
    pub fn insert_record(&self, account: AccountEntry) -> Result<(), BimilError> {
        let mut data = self.write_lock()?;

        if data.accounts.contains_key(&account.id) {
            return Err(BimilError::duplicate("Account", account.id.as_str()));
        }

        let id = account.id.clone();
        data.accounts.insert(id.clone(), account);
        if let Err(e) = self.persist(&data) {
            data.accounts.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Delete every account and every hint, returning how many accounts went
    pub fn delete_all(&self) -> Result<usize, BimilError> {
        let mut data = self.write_lock()?;

        let previous = std::mem::take(&mut *data);
        if let Err(e) = self.persist(&data) {
            *data = previous;
            return Err(e);
        }
        Ok(previous.accounts.len())
    }

    /// Get the SSO hint of an account
    pub fn get_sso_hint(&self, account_id: &AccountId) -> Result<Option<SsoHint>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .sso_hints
            .values()
            .find(|h| &h.account_id == account_id)
            .cloned())
    }

    /// Attach an SSO hint to an existing account
    pub fn add_sso_hint(&self, hint: SsoHint) -> Result<(), BimilError> {
        let mut data = self.write_lock()?;

        if !data.accounts.contains_key(&hint.account_id) {
            return Err(BimilError::account_not_found(hint.account_id.as_str()));
        }
        if data.sso_hints.contains_key(&hint.id)
            || data
                .sso_hints
                .values()
                .any(|h| h.account_id == hint.account_id)
        {
            return Err(BimilError::duplicate("SSO hint", hint.id.as_str()));
        }

        let id = hint.id.clone();
        data.sso_hints.insert(id.clone(), hint);
        if let Err(e) = self.persist(&data) {
            data.sso_hints.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Get the password hint of an account
    pub fn get_password_hint(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<PasswordHint>, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .password_hints
            .values()
            .find(|h| &h.account_id == account_id)
            .cloned())
    }

    /// Attach a password hint to an existing account
    pub fn add_password_hint(&self, hint: PasswordHint) -> Result<(), BimilError> {
        let mut data = self.write_lock()?;

        if !data.accounts.contains_key(&hint.account_id) {
            return Err(BimilError::account_not_found(hint.account_id.as_str()));
        }
        if data.password_hints.contains_key(&hint.id)
            || data
                .password_hints
                .values()
                .any(|h| h.account_id == hint.account_id)
        {
            return Err(BimilError::duplicate("Password hint", hint.id.as_str()));
        }

        let id = hint.id.clone();
        data.password_hints.insert(id.clone(), hint);
        if let Err(e) = self.persist(&data) {
            data.password_hints.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Count accounts
    pub fn count(&self) -> Result<usize, BimilError> {
        let data = self
            .data
            .read()
            .map_err(|e| BimilError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.accounts.len())
    }
}

fn sorted_accounts(accounts: &HashMap<AccountId, AccountEntry>) -> Vec<AccountEntry> {
    let mut accounts: Vec<_> = accounts.values().cloned().collect();
    accounts.sort_by(|a, b| {
        a.service_name
            .to_lowercase()
            .cmp(&b.service_name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    accounts
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn read_all(&self) -> BimilResult<Vec<AccountEntry>> {
        self.get_all()
    }

    async fn insert(&self, account: AccountEntry) -> BimilResult<()> {
        self.insert_record(account)
    }

    async fn delete_all(&self) -> BimilResult<()> {
        AccountRepository::delete_all(self).map(|_| ())
    }

    async fn read_sso_hint(&self, account_id: &AccountId) -> BimilResult<Option<SsoHint>> {
        self.get_sso_hint(account_id)
    }

    async fn insert_sso_hint(&self, hint: SsoHint) -> BimilResult<()> {
        self.add_sso_hint(hint)
    }

    async fn read_password_hint(
        &self,
        account_id: &AccountId,
    ) -> BimilResult<Option<PasswordHint>> {
        self.get_password_hint(account_id)
    }

    async fn insert_password_hint(&self, hint: PasswordHint) -> BimilResult<()> {
        self.add_password_hint(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, LoginType, SsoProvider};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let repo = AccountRepository::new(path);
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn account(service: &str, login_type: LoginType) -> AccountEntry {
        AccountEntry::new(service, "me", login_type, CategoryId::from("other"))
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_create_and_reload() {
        let (temp_dir, repo) = create_test_repo();

        let entry = account("GitHub", LoginType::Password);
        let id = entry.id.clone();
        repo.create(entry).unwrap();
        repo.add_password_hint(PasswordHint::new(id.clone())).unwrap();

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();

        let loaded = repo2.get_with_hint(&id).unwrap().unwrap();
        assert_eq!(loaded.account.service_name, "GitHub");
        assert!(loaded.password_hint.is_some());
        assert!(loaded.sso_hint.is_none());
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let (_temp_dir, repo) = create_test_repo();

        let entry = account("GitHub", LoginType::Password);
        repo.create(entry.clone()).unwrap();
        assert!(repo.create(entry).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_hint_requires_account() {
        let (_temp_dir, repo) = create_test_repo();

        let err = repo
            .add_sso_hint(SsoHint::new(AccountId::from("missing"), SsoProvider::Google))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_one_hint_per_kind() {
        let (_temp_dir, repo) = create_test_repo();

        let entry = account("Notion", LoginType::Sso);
        let id = entry.id.clone();
        repo.create(entry).unwrap();

        repo.add_sso_hint(SsoHint::new(id.clone(), SsoProvider::Google))
            .unwrap();
        let err = repo
            .add_sso_hint(SsoHint::new(id.clone(), SsoProvider::Apple))
            .unwrap_err();
        assert!(err.is_duplicate());

        assert_eq!(
            repo.get_sso_hint(&id).unwrap().unwrap().provider,
            SsoProvider::Google
        );
    }

    #[test]
    fn test_delete_all_cascades() {
        let (temp_dir, repo) = create_test_repo();

        let sso = account("Notion", LoginType::Sso);
        let password = account("Bank", LoginType::Password);
        let (sso_id, password_id) = (sso.id.clone(), password.id.clone());
        repo.create(sso).unwrap();
        repo.create(password).unwrap();
        repo.add_sso_hint(SsoHint::new(sso_id.clone(), SsoProvider::Google))
            .unwrap();
        repo.add_password_hint(PasswordHint::new(password_id.clone()))
            .unwrap();

        assert_eq!(repo.delete_all().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_sso_hint(&sso_id).unwrap().is_none());
        assert!(repo.get_password_hint(&password_id).unwrap().is_none());

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 0);
    }

    #[test]
    fn test_ordering_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();

        repo.create(account("zoom", LoginType::Sso)).unwrap();
        repo.create(account("Amazon", LoginType::Password)).unwrap();
        repo.create(account("bank", LoginType::Password)).unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|a| a.service_name)
            .collect();
        assert_eq!(names, vec!["Amazon", "bank", "zoom"]);
    }

    #[tokio::test]
    async fn test_store_trait() {
        let (_temp_dir, repo) = create_test_repo();
        let store: &dyn AccountStore = &repo;

        let entry = account("GitHub", LoginType::Password);
        let id = entry.id.clone();
        store.insert(entry).await.unwrap();
        store
            .insert_password_hint(PasswordHint::new(id.clone()))
            .await
            .unwrap();

        assert_eq!(store.read_all().await.unwrap().len(), 1);
        assert!(store.read_password_hint(&id).await.unwrap().is_some());
        assert!(store.read_sso_hint(&id).await.unwrap().is_none());

        store.delete_all().await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_insert_skips_validation() {
        let (_temp_dir, repo) = create_test_repo();
        let store: &dyn AccountStore = &repo;

        let entry = account(&"한".repeat(101), LoginType::Sso);
        assert!(matches!(
            repo.create(entry.clone()),
            Err(BimilError::Validation(_))
        ));

        store.insert(entry.clone()).await.unwrap();
        assert!(store.insert(entry).await.unwrap_err().is_duplicate());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let repo = AccountRepository::new(path.clone());

        // A directory where the file should be makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        let lost = account("Lost", LoginType::Password);
        assert!(repo.create(lost.clone()).is_err());
        assert!(repo.get(&lost.id).unwrap().is_none());

        std::fs::remove_dir_all(&path).unwrap();
        let kept = account("Kept", LoginType::Password);
        let kept_id = kept.id.clone();
        repo.create(kept).unwrap();

        let reloaded = AccountRepository::new(path);
        reloaded.load().unwrap();
        let names: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|a| a.service_name)
            .collect();
        assert_eq!(names, vec!["Kept"]);
        assert!(reloaded.get(&kept_id).unwrap().is_some());
    }

    #[test]
    fn test_failed_hint_write_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let repo = AccountRepository::new(path.clone());

        let entry = account("Bank", LoginType::Password);
        let id = entry.id.clone();
        repo.create(entry).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        assert!(repo.add_password_hint(PasswordHint::new(id.clone())).is_err());
        assert!(repo.get_password_hint(&id).unwrap().is_none());
        assert!(repo.delete_all().is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }
}
