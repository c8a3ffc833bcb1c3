//! App settings model
//!
//! A single settings record exists per installation. It mixes presentation
//! preferences (theme, language, region) with lock-screen security state
//! (PIN hash/salt, biometric flag, auto-lock). Only the former is ever
//! exported by a backup.

use serde::{Deserialize, Serialize};

symbolic_enum! {
    /// Color theme preference
    #[derive(Default)]
    pub enum Theme {
        Light => "LIGHT",
        Dark => "DARK",
        #[default]
        System => "SYSTEM",
    }
}

symbolic_enum! {
    /// Region used to suggest SSO providers
    #[derive(Default)]
    pub enum Region {
        #[default]
        Global => "GLOBAL",
        Kr => "KR",
        Jp => "JP",
        Cn => "CN",
        Us => "US",
        Eu => "EU",
        Ru => "RU",
        In => "IN",
        Sea => "SEA",
        Latam => "LATAM",
    }
}

impl Region {
    /// Human-readable region name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Kr => "Korea",
            Self::Jp => "Japan",
            Self::Cn => "China",
            Self::Us => "United States",
            Self::Eu => "Europe",
            Self::Ru => "Russia",
            Self::In => "India",
            Self::Sea => "Southeast Asia",
            Self::Latam => "Latin America",
        }
    }
}

/// The app settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub theme: Theme,

    /// Language tag, or "SYSTEM" to follow the device
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub region: Region,

    /// Hash of the lock-screen PIN (never exported)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,

    /// Salt of the lock-screen PIN (never exported)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_salt: Option<String>,

    /// Whether biometric unlock is enabled (never exported)
    #[serde(default)]
    pub biometric_enabled: bool,

    /// Seconds before auto-lock, -1 to disable
    #[serde(default = "default_auto_lock")]
    pub auto_lock_seconds: i32,

    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_language() -> String {
    "SYSTEM".to_string()
}

fn default_auto_lock() -> i32 {
    -1
}

fn default_schema_version() -> u32 {
    1
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: default_language(),
            region: Region::default(),
            pin_hash: None,
            pin_salt: None,
            biometric_enabled: false,
            auto_lock_seconds: default_auto_lock(),
            schema_version: default_schema_version(),
        }
    }
}

impl AppSettings {
    /// Whether a lock-screen PIN is configured
    pub fn is_pin_enabled(&self) -> bool {
        self.pin_hash.is_some()
    }
}
