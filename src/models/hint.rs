//! Login hint models
//!
//! An account carries at most one hint, chosen by its login type:
//! SSO accounts remember which identity provider they sign in with,
//! password accounts remember the shape of the password (never the
//! password itself).

use serde::{Deserialize, Serialize};

use super::ids::{AccountId, HintId};
use super::now_millis;
use super::settings::Region;

symbolic_enum! {
    /// Identity provider used for single sign-on
    #[derive(Default)]
    pub enum SsoProvider {
        Google => "GOOGLE",
        Apple => "APPLE",
        Facebook => "FACEBOOK",
        Microsoft => "MICROSOFT",
        Github => "GITHUB",
        Twitter => "TWITTER",
        Linkedin => "LINKEDIN",
        Amazon => "AMAZON",
        Kakao => "KAKAO",
        Naver => "NAVER",
        Toss => "TOSS",
        Line => "LINE",
        YahooJapan => "YAHOO_JAPAN",
        Rakuten => "RAKUTEN",
        Wechat => "WECHAT",
        Alipay => "ALIPAY",
        Qq => "QQ",
        Weibo => "WEIBO",
        Vk => "VK",
        Yandex => "YANDEX",
        Mailru => "MAILRU",
        /// Any provider not listed; the name lives in `provider_custom`
        #[default]
        Custom => "CUSTOM",
    }
}

impl SsoProvider {
    /// Human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Apple => "Apple",
            Self::Facebook => "Facebook",
            Self::Microsoft => "Microsoft",
            Self::Github => "GitHub",
            Self::Twitter => "Twitter/X",
            Self::Linkedin => "LinkedIn",
            Self::Amazon => "Amazon",
            Self::Kakao => "Kakao",
            Self::Naver => "Naver",
            Self::Toss => "Toss",
            Self::Line => "LINE",
            Self::YahooJapan => "Yahoo! Japan",
            Self::Rakuten => "Rakuten",
            Self::Wechat => "WeChat",
            Self::Alipay => "Alipay",
            Self::Qq => "QQ",
            Self::Weibo => "Weibo",
            Self::Vk => "VK",
            Self::Yandex => "Yandex",
            Self::Mailru => "Mail.ru",
            Self::Custom => "Other",
        }
    }

    /// Parse a provider name, resolving anything unrecognised to `Custom`
    pub fn from_name_or_custom(s: &str) -> Self {
        Self::from_name(s).unwrap_or(Self::Custom)
    }

    /// Providers worth suggesting for a region
    pub fn for_region(region: Region) -> Vec<SsoProvider> {
        use SsoProvider::*;

        let global = [Google, Apple, Facebook, Microsoft, Github];
        let extra: &[SsoProvider] = match region {
            Region::Global => &[],
            Region::Kr => &[Kakao, Naver, Toss],
            Region::Jp => &[Line, YahooJapan, Rakuten],
            Region::Cn => return vec![Wechat, Alipay, Qq, Weibo],
            Region::Us | Region::Eu => &[Twitter, Linkedin, Amazon],
            Region::Ru => &[Vk, Yandex, Mailru],
            Region::In => &[Twitter, Linkedin],
            Region::Sea => &[Line],
            Region::Latam => &[Twitter],
        };

        global.iter().chain(extra.iter()).copied().collect()
    }
}

symbolic_enum! {
    /// Whether a password rule applies: known yes, known no, or not recorded
    #[derive(Default)]
    pub enum RequirementStatus {
        Yes => "YES",
        No => "NO",
        #[default]
        Unknown => "UNKNOWN",
    }
}

impl RequirementStatus {
    /// Parse a status name, resolving anything unrecognised to `Unknown`
    pub fn from_name_or_unknown(s: &str) -> Self {
        Self::from_name(s).unwrap_or(Self::Unknown)
    }
}

/// Hint for an account that signs in through an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoHint {
    pub id: HintId,
    pub account_id: AccountId,
    pub provider: SsoProvider,

    /// Free-text provider name when `provider` is `Custom`
    #[serde(default)]
    pub provider_custom: Option<String>,

    #[serde(default)]
    pub created_at: i64,
}

impl SsoHint {
    /// Create a new SSO hint for an account
    pub fn new(account_id: AccountId, provider: SsoProvider) -> Self {
        Self {
            id: HintId::new(),
            account_id,
            provider,
            provider_custom: None,
            created_at: now_millis(),
        }
    }

    /// Provider name to show, preferring the custom text for `Custom`
    pub fn provider_label(&self) -> &str {
        match (&self.provider, &self.provider_custom) {
            (SsoProvider::Custom, Some(custom)) if !custom.trim().is_empty() => custom.as_str(),
            (provider, _) => provider.display_name(),
        }
    }
}

/// Hint describing the shape of an account's password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHint {
    pub id: HintId,
    pub account_id: AccountId,

    #[serde(default = "default_min_length")]
    pub min_length: i32,

    #[serde(default)]
    pub max_length: Option<i32>,

    #[serde(default)]
    pub requires_special: RequirementStatus,
    #[serde(default)]
    pub requires_uppercase: RequirementStatus,
    #[serde(default)]
    pub requires_lowercase: RequirementStatus,
    #[serde(default)]
    pub requires_number: RequirementStatus,

    #[serde(default)]
    pub allowed_special_chars: Option<String>,

    /// Free-text reminder written by the user
    #[serde(default)]
    pub personal_hint: Option<String>,

    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_min_length() -> i32 {
    8
}

impl PasswordHint {
    /// Create a password hint with every rule unknown
    pub fn new(account_id: AccountId) -> Self {
        let now = now_millis();
        Self {
            id: HintId::new(),
            account_id,
            min_length: default_min_length(),
            max_length: None,
            requires_special: RequirementStatus::Unknown,
            requires_uppercase: RequirementStatus::Unknown,
            requires_lowercase: RequirementStatus::Unknown,
            requires_number: RequirementStatus::Unknown,
            allowed_special_chars: None,
            personal_hint: None,
            created_at: now,
            updated_at: now,
        }
    }
}
