//! Canonical backup schema
//!
//! A flat, versioned representation of the whole store, decoupled from the
//! live models. Field names are camelCase and enums travel as their
//! symbolic names, so the JSON stays readable by other clients and by later
//! versions of this one. Unknown fields are ignored on decode.

use serde::{Deserialize, Serialize};

/// Current backup format version
pub const BACKUP_VERSION: u32 = 1;

/// Version string of the producing application
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root of a backup payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: u32,
    /// Epoch millis, informational only
    pub created_at: i64,
    pub app_version: String,
    pub settings: BackupSettings,
    pub categories: Vec<BackupCategory>,
    pub accounts: Vec<BackupAccountWithHint>,
}

/// Exported settings: presentation preferences only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSettings {
    pub theme: String,
    pub language: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub is_default: bool,
    pub sort_order: i32,
}

/// One account and whichever hint it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupAccountWithHint {
    pub account: BackupAccount,
    #[serde(default)]
    pub sso_hint: Option<BackupSsoHint>,
    #[serde(default)]
    pub password_hint: Option<BackupPasswordHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupAccount {
    pub id: String,
    pub service_name: String,
    pub username: String,
    #[serde(default)]
    pub website_url: Option<String>,
    pub login_type: String,
    pub category_id: String,
    pub is_favorite: bool,
    #[serde(default)]
    pub memo: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSsoHint {
    pub id: String,
    pub provider: String,
    #[serde(default)]
    pub provider_custom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPasswordHint {
    pub id: String,
    pub min_length: i32,
    #[serde(default)]
    pub max_length: Option<i32>,
    pub requires_special: String,
    pub requires_uppercase: String,
    pub requires_lowercase: String,
    pub requires_number: String,
    #[serde(default)]
    pub allowed_special_chars: Option<String>,
    #[serde(default)]
    pub personal_hint: Option<String>,
}
