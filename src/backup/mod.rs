//! Encrypted backup and restore for Bimil
//!
//! # Architecture
//!
//! - `schema`: the canonical, versioned payload (`BackupFile`)
//! - `serializer`: mapping between live models and the payload
//! - `BackupService`: collects the store into a payload and encrypts it,
//!   or decrypts a payload and replays it into the store
//! - `BackupFiles`: timestamped backup files, listing and retention
//!
//! # Backup Format
//!
//! The payload is compact camelCase JSON, encrypted as
//! `salt(16) || nonce(12) || ciphertext || tag(16)` with AES-256-GCM under
//! a PBKDF2-HMAC-SHA256 key (see [`crate::crypto`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use bimil::backup::{BackupFiles, BackupService};
//!
//! let service = BackupService::new(
//!     storage.settings.clone(),
//!     storage.categories.clone(),
//!     storage.accounts.clone(),
//! );
//!
//! let blob = service.create_backup("secret").await?;
//! let path = files.write(&blob)?;
//!
//! // Later, on another device
//! let result = service.restore_backup(&blob, "secret", false).await;
//! println!("{}", result.summary());
//! ```

mod files;
mod restore;
pub mod schema;
pub mod serializer;
mod service;

pub use files::{BackupFiles, BackupInfo, BACKUP_EXTENSION, LATEST};
pub use restore::{BackupSummary, RestoreResult};
pub use schema::{BackupFile, APP_VERSION, BACKUP_VERSION};
pub use service::BackupService;
