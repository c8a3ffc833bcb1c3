//! Bimil - password-hint manager core with encrypted backup
//!
//! Bimil keeps hints about how each account is logged into (which SSO
//! provider, which password rules) without ever storing a password. This
//! crate holds the data model, a JSON file store and the encrypted backup
//! subsystem that moves the whole store between devices.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths and tool settings
//! - `error`: Custom error types
//! - `models`: Settings, categories, accounts and their hints
//! - `storage`: Store traits and the JSON file implementation
//! - `crypto`: PBKDF2 key derivation and AES-256-GCM sealing
//! - `backup`: Backup payload, create/restore orchestration and backup files
//! - `audit`: Audit logging of backup events
//! - `logging`: Diagnostic `tracing` subscriber setup
//! - `cli`: Command handlers for the `bimil` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use bimil::backup::BackupService;
//! use bimil::config::BimilPaths;
//! use bimil::storage::Storage;
//!
//! let storage = Storage::open(BimilPaths::new()?)?;
//! let service = BackupService::new(
//!     storage.settings.clone(),
//!     storage.categories.clone(),
//!     storage.accounts.clone(),
//! );
//! let blob = service.create_backup("correct horse").await?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;

pub use backup::{BackupService, RestoreResult};
pub use error::{BimilError, BimilResult};
