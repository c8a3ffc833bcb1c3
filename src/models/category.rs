//! Category model
//!
//! Categories group accounts for display (Finance, SNS, Work, ...).
//! Exactly one category is flagged as the default; accounts fall back to it
//! when their own category is removed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::now_millis;

/// An account category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Display color as a `#RRGGBB` string
    #[serde(default = "default_color")]
    pub color: String,

    /// Icon name
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Whether this is the fallback category
    #[serde(default)]
    pub is_default: bool,

    /// Sort order for display
    #[serde(default)]
    pub sort_order: i32,

    /// When the category was created (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

fn default_color() -> String {
    "#6B7280".to_string()
}

fn default_icon() -> String {
    "folder".to_string()
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: default_color(),
            icon: default_icon(),
            is_default: false,
            sort_order: 0,
            created_at: now_millis(),
        }
    }

    /// Create a category with a fixed slug ID
    fn builtin(
        id: &str,
        name: &str,
        color: &str,
        icon: &str,
        is_default: bool,
        sort_order: i32,
    ) -> Self {
        Self {
            id: CategoryId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            is_default,
            sort_order,
            created_at: 0,
        }
    }

    /// The categories every new installation starts with
    pub fn defaults() -> Vec<Category> {
        vec![
            Self::builtin("finance", "Finance", "#10B981", "bank", false, 0),
            Self::builtin("sns", "SNS", "#3B82F6", "share", false, 1),
            Self::builtin("shopping", "Shopping", "#F59E0B", "cart", false, 2),
            Self::builtin("work", "Work", "#8B5CF6", "briefcase", false, 3),
            Self::builtin("entertainment", "Entertainment", "#EC4899", "play", false, 4),
            Self::builtin("other", "Other", "#6B7280", "folder", true, 5),
        ]
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let chars = self.name.chars().count();
        if chars > 50 {
            return Err(CategoryValidationError::NameTooLong(chars));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => write!(f, "Invalid category color: {}", color),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
