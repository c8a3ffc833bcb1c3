//! Account model
//!
//! An account entry records that the user has a login somewhere: the
//! service, the username, and how they sign in. The login type decides
//! which kind of hint the account may carry.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hint::{PasswordHint, SsoHint};
use super::ids::{AccountId, CategoryId};
use super::now_millis;

symbolic_enum! {
    /// How the user signs in to an account
    pub enum LoginType {
        Sso => "SSO",
        Password => "PASSWORD",
    }
}

/// A stored account entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Unique identifier
    pub id: AccountId,

    /// Service name (e.g., "GitHub")
    pub service_name: String,

    /// Username or email used on the service
    pub username: String,

    #[serde(default)]
    pub website_url: Option<String>,

    pub login_type: LoginType,

    pub category_id: CategoryId,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub memo: Option<String>,

    /// Favicon bytes, if one was fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<Vec<u8>>,

    #[serde(default)]
    pub view_count: i32,

    /// When the account was created (epoch millis)
    #[serde(default)]
    pub created_at: i64,

    /// When the account was last modified (epoch millis)
    #[serde(default)]
    pub updated_at: i64,

    #[serde(default)]
    pub last_viewed_at: Option<i64>,
}

impl AccountEntry {
    /// Create a new account entry
    pub fn new(
        service_name: impl Into<String>,
        username: impl Into<String>,
        login_type: LoginType,
        category_id: CategoryId,
    ) -> Self {
        let now = now_millis();
        Self {
            id: AccountId::new(),
            service_name: service_name.into(),
            username: username.into(),
            website_url: None,
            login_type,
            category_id,
            is_favorite: false,
            memo: None,
            icon_data: None,
            view_count: 0,
            created_at: now,
            updated_at: now,
            last_viewed_at: None,
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.service_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyServiceName);
        }

        let chars = self.service_name.chars().count();
        if chars > 100 {
            return Err(AccountValidationError::ServiceNameTooLong(chars));
        }

        Ok(())
    }
}

impl fmt::Display for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.service_name, self.username)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyServiceName,
    ServiceNameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyServiceName => write!(f, "Service name cannot be empty"),
            Self::ServiceNameTooLong(len) => {
                write!(f, "Service name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// An account together with whatever hint it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountWithHint {
    pub account: AccountEntry,
    pub sso_hint: Option<SsoHint>,
    pub password_hint: Option<PasswordHint>,
}

impl AccountWithHint {
    /// Wrap an account with no hint recorded
    pub fn bare(account: AccountEntry) -> Self {
        Self {
            account,
            sso_hint: None,
            password_hint: None,
        }
    }

    /// Whether a hint of the opposite kind to the login type is present
    pub fn has_mismatched_hint(&self) -> bool {
        match self.account.login_type {
            LoginType::Sso => self.password_hint.is_some(),
            LoginType::Password => self.sso_hint.is_some(),
        }
    }
}
