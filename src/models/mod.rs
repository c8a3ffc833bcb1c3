//! Core data models for Bimil
//!
//! This module contains the live domain shapes: app settings, categories,
//! accounts and the two kinds of login hint. None of these ever hold a real
//! password; they describe how an account is logged into.

/// Generates a closed enum whose variants carry a stable symbolic name.
///
/// The name is what gets persisted (storage files and backups), so it must
/// never change once shipped. `from_name` returns `None` for unknown names;
/// callers decide whether that is an error or falls back to a default.
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Stable symbolic name of this variant
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Parse a symbolic name (exact match)
            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::BimilError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| {
                    crate::error::BimilError::Validation(format!(
                        "Unknown {} value: {}",
                        stringify!($name),
                        s
                    ))
                })
            }
        }
    };
}

pub mod account;
pub mod category;
pub mod hint;
pub mod ids;
pub mod settings;

pub use account::{AccountEntry, AccountWithHint, LoginType};
pub use category::Category;
pub use hint::{PasswordHint, RequirementStatus, SsoHint, SsoProvider};
pub use ids::{AccountId, CategoryId, HintId};
pub use settings::{AppSettings, Region, Theme};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
