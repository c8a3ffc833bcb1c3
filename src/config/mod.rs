//! Configuration module for Bimil
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Tool settings persistence

pub mod paths;
pub mod settings;

pub use paths::BimilPaths;
pub use settings::{BackupRetention, Settings};
