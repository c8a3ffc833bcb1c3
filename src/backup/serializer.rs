//! Mapping between live models and the canonical backup schema

use crate::error::{BimilError, BimilResult};
use crate::models::{
    now_millis, AccountEntry, AccountId, AccountWithHint, AppSettings, Category, CategoryId,
    HintId, LoginType, PasswordHint, Region, RequirementStatus, SsoHint, SsoProvider, Theme,
};

use super::schema::{
    BackupAccount, BackupAccountWithHint, BackupCategory, BackupFile, BackupPasswordHint,
    BackupSettings, BackupSsoHint, APP_VERSION, BACKUP_VERSION,
};

/// Live data decoded from a backup payload
///
/// Accounts are decoded one by one: an account whose login type cannot be
/// parsed is an `Err` in its slot and does not affect its neighbours.
#[derive(Debug)]
pub struct DecodedBackup {
    pub settings: AppSettings,
    pub categories: Vec<Category>,
    pub accounts: Vec<BimilResult<AccountWithHint>>,
}

/// Build a backup payload from live data
///
/// Lock-screen state (PIN hash and salt, biometric flag) and account icons
/// are never written.
pub fn serialize(
    settings: &AppSettings,
    categories: &[Category],
    accounts: &[AccountWithHint],
) -> BackupFile {
    BackupFile {
        version: BACKUP_VERSION,
        created_at: now_millis(),
        app_version: APP_VERSION.to_string(),
        settings: BackupSettings {
            theme: settings.theme.name().to_string(),
            language: settings.language.clone(),
            region: settings.region.name().to_string(),
        },
        categories: categories.iter().map(category_to_backup).collect(),
        accounts: accounts.iter().map(account_to_backup).collect(),
    }
}

/// Encode a payload as compact JSON
pub fn to_bytes(file: &BackupFile) -> BimilResult<Vec<u8>> {
    serde_json::to_vec(file)
        .map_err(|e| BimilError::Backup(format!("Failed to encode backup: {}", e)))
}

/// Decode a payload, ignoring fields this version does not know
pub fn from_bytes(bytes: &[u8]) -> BimilResult<BackupFile> {
    serde_json::from_slice(bytes)
        .map_err(|e| BimilError::Backup(format!("Malformed backup payload: {}", e)))
}

/// Map a payload back to live models
///
/// Unrecognised theme, region, provider and requirement names fall back to
/// their default variants. Settings fields that are not part of a backup
/// keep their defaults.
pub fn deserialize(file: &BackupFile) -> DecodedBackup {
    let settings = AppSettings {
        theme: Theme::from_name(&file.settings.theme).unwrap_or_default(),
        language: file.settings.language.clone(),
        region: Region::from_name(&file.settings.region).unwrap_or_default(),
        ..AppSettings::default()
    };

    DecodedBackup {
        settings,
        categories: file.categories.iter().map(category_from_backup).collect(),
        accounts: file.accounts.iter().map(account_from_backup).collect(),
    }
}

fn category_to_backup(category: &Category) -> BackupCategory {
    BackupCategory {
        id: category.id.to_string(),
        name: category.name.clone(),
        color: category.color.clone(),
        icon: category.icon.clone(),
        is_default: category.is_default,
        sort_order: category.sort_order,
    }
}

fn category_from_backup(category: &BackupCategory) -> Category {
    Category {
        id: CategoryId::from(category.id.as_str()),
        name: category.name.clone(),
        color: category.color.clone(),
        icon: category.icon.clone(),
        is_default: category.is_default,
        sort_order: category.sort_order,
        created_at: now_millis(),
    }
}

fn account_to_backup(entry: &AccountWithHint) -> BackupAccountWithHint {
    let account = &entry.account;

    BackupAccountWithHint {
        account: BackupAccount {
            id: account.id.to_string(),
            service_name: account.service_name.clone(),
            username: account.username.clone(),
            website_url: account.website_url.clone(),
            login_type: account.login_type.name().to_string(),
            category_id: account.category_id.to_string(),
            is_favorite: account.is_favorite,
            memo: account.memo.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        },
        sso_hint: entry.sso_hint.as_ref().map(|hint| BackupSsoHint {
            id: hint.id.to_string(),
            provider: hint.provider.name().to_string(),
            provider_custom: hint.provider_custom.clone(),
        }),
        password_hint: entry.password_hint.as_ref().map(|hint| BackupPasswordHint {
            id: hint.id.to_string(),
            min_length: hint.min_length,
            max_length: hint.max_length,
            requires_special: hint.requires_special.name().to_string(),
            requires_uppercase: hint.requires_uppercase.name().to_string(),
            requires_lowercase: hint.requires_lowercase.name().to_string(),
            requires_number: hint.requires_number.name().to_string(),
            allowed_special_chars: hint.allowed_special_chars.clone(),
            personal_hint: hint.personal_hint.clone(),
        }),
    }
}

fn account_from_backup(entry: &BackupAccountWithHint) -> BimilResult<AccountWithHint> {
    let backup = &entry.account;
    let login_type: LoginType = backup.login_type.parse()?;
    let account_id = AccountId::from(backup.id.as_str());

    let account = AccountEntry {
        id: account_id.clone(),
        service_name: backup.service_name.clone(),
        username: backup.username.clone(),
        website_url: backup.website_url.clone(),
        login_type,
        category_id: CategoryId::from(backup.category_id.as_str()),
        is_favorite: backup.is_favorite,
        memo: backup.memo.clone(),
        icon_data: None,
        view_count: 0,
        created_at: backup.created_at,
        updated_at: backup.updated_at,
        last_viewed_at: None,
    };

    // Hints carry no timestamps of their own in a backup
    let sso_hint = entry.sso_hint.as_ref().map(|hint| SsoHint {
        id: HintId::from(hint.id.as_str()),
        account_id: account_id.clone(),
        provider: SsoProvider::from_name_or_custom(&hint.provider),
        provider_custom: hint.provider_custom.clone(),
        created_at: backup.created_at,
    });

    let password_hint = entry.password_hint.as_ref().map(|hint| PasswordHint {
        id: HintId::from(hint.id.as_str()),
        account_id: account_id.clone(),
        min_length: hint.min_length,
        max_length: hint.max_length,
        requires_special: RequirementStatus::from_name_or_unknown(&hint.requires_special),
        requires_uppercase: RequirementStatus::from_name_or_unknown(&hint.requires_uppercase),
        requires_lowercase: RequirementStatus::from_name_or_unknown(&hint.requires_lowercase),
        requires_number: RequirementStatus::from_name_or_unknown(&hint.requires_number),
        allowed_special_chars: hint.allowed_special_chars.clone(),
        personal_hint: hint.personal_hint.clone(),
        created_at: backup.created_at,
        updated_at: backup.updated_at,
    });

    Ok(AccountWithHint {
        account,
        sso_hint,
        password_hint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> (AppSettings, Vec<Category>, Vec<AccountWithHint>) {
        let settings = AppSettings {
            theme: Theme::Dark,
            language: "ko".into(),
            region: Region::Kr,
            pin_hash: Some("hash".into()),
            pin_salt: Some("salt".into()),
            biometric_enabled: true,
            auto_lock_seconds: 60,
            schema_version: 1,
        };

        let categories = Category::defaults();

        let mut github = AccountEntry::new(
            "GitHub",
            "octo",
            LoginType::Password,
            CategoryId::from("work"),
        );
        github.website_url = Some("https://github.com".into());
        github.memo = Some("work account".into());
        github.is_favorite = true;
        github.icon_data = Some(vec![0x89, 0x50, 0x4e, 0x47]);
        let mut password_hint = PasswordHint::new(github.id.clone());
        password_hint.min_length = 12;
        password_hint.max_length = Some(64);
        password_hint.requires_special = RequirementStatus::Yes;
        password_hint.requires_number = RequirementStatus::No;
        password_hint.personal_hint = Some("dog's name + year".into());

        let kakao = AccountEntry::new("Melon", "me", LoginType::Sso, CategoryId::from("sns"));
        let mut sso_hint = SsoHint::new(kakao.id.clone(), SsoProvider::Custom);
        sso_hint.provider_custom = Some("Okta".into());

        let accounts = vec![
            AccountWithHint {
                account: github,
                sso_hint: None,
                password_hint: Some(password_hint),
            },
            AccountWithHint {
                account: kakao,
                sso_hint: Some(sso_hint),
                password_hint: None,
            },
        ];

        (settings, categories, accounts)
    }

    #[test]
    fn test_serialize_header() {
        let (settings, categories, accounts) = sample_state();
        let file = serialize(&settings, &categories, &accounts);

        assert_eq!(file.version, BACKUP_VERSION);
        assert_eq!(file.app_version, APP_VERSION);
        assert!(file.created_at > 0);
        assert_eq!(file.categories.len(), 6);
        assert_eq!(file.accounts.len(), 2);
        assert_eq!(file.settings.theme, "DARK");
        assert_eq!(file.settings.region, "KR");
    }

    #[test]
    fn test_security_fields_never_exported() {
        let (settings, categories, accounts) = sample_state();
        let file = serialize(&settings, &categories, &accounts);
        let value: serde_json::Value = serde_json::from_slice(&to_bytes(&file).unwrap()).unwrap();

        let mut keys: Vec<&String> = value["settings"].as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, ["language", "region", "theme"]);

        let json = value.to_string();
        assert!(!json.contains("\"hash\""));
        assert!(!json.contains("\"salt\""));
    }

    #[test]
    fn test_icon_data_not_exported() {
        let (settings, categories, accounts) = sample_state();
        let file = serialize(&settings, &categories, &accounts);
        let value = serde_json::to_value(&file.accounts[0].account).unwrap();
        assert!(value.get("iconData").is_none());
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let (settings, categories, accounts) = sample_state();
        let file = serialize(&settings, &categories, &accounts);

        let decoded = from_bytes(&to_bytes(&file).unwrap()).unwrap();
        assert_eq!(decoded, file);

        let live = deserialize(&decoded);
        assert_eq!(live.settings.theme, settings.theme);
        assert_eq!(live.settings.language, settings.language);
        assert_eq!(live.settings.region, settings.region);
        assert!(!live.settings.is_pin_enabled());
        assert!(!live.settings.biometric_enabled);

        for (restored, original) in live.categories.iter().zip(&categories) {
            assert_eq!(restored.id, original.id);
            assert_eq!(restored.name, original.name);
            assert_eq!(restored.color, original.color);
            assert_eq!(restored.icon, original.icon);
            assert_eq!(restored.is_default, original.is_default);
            assert_eq!(restored.sort_order, original.sort_order);
        }

        let restored: Vec<AccountWithHint> =
            live.accounts.into_iter().map(|a| a.unwrap()).collect();
        for (restored, original) in restored.iter().zip(&accounts) {
            let (r, o) = (&restored.account, &original.account);
            assert_eq!(r.id, o.id);
            assert_eq!(r.service_name, o.service_name);
            assert_eq!(r.username, o.username);
            assert_eq!(r.website_url, o.website_url);
            assert_eq!(r.login_type, o.login_type);
            assert_eq!(r.category_id, o.category_id);
            assert_eq!(r.is_favorite, o.is_favorite);
            assert_eq!(r.memo, o.memo);
            assert_eq!(r.created_at, o.created_at);
            assert_eq!(r.updated_at, o.updated_at);
        }

        let password = restored[0].password_hint.as_ref().unwrap();
        let original = accounts[0].password_hint.as_ref().unwrap();
        assert_eq!(password.id, original.id);
        assert_eq!(password.account_id, original.account_id);
        assert_eq!(password.min_length, 12);
        assert_eq!(password.max_length, Some(64));
        assert_eq!(password.requires_special, RequirementStatus::Yes);
        assert_eq!(password.requires_number, RequirementStatus::No);
        assert_eq!(password.requires_uppercase, RequirementStatus::Unknown);
        assert_eq!(password.personal_hint, original.personal_hint);

        let sso = restored[1].sso_hint.as_ref().unwrap();
        assert_eq!(sso.provider, SsoProvider::Custom);
        assert_eq!(sso.provider_label(), "Okta");

        // A second pass through the schema is lossless
        let again = serialize(&live.settings, &live.categories, &restored);
        assert_eq!(again.categories, file.categories);
        assert_eq!(again.accounts, file.accounts);
        assert_eq!(again.settings, file.settings);
    }

    #[test]
    fn test_unknown_enum_names_fall_back() {
        let (settings, categories, accounts) = sample_state();
        let mut file = serialize(&settings, &categories, &accounts);
        file.settings.theme = "NEON".into();
        file.settings.region = "ATLANTIS".into();
        file.accounts[1].sso_hint.as_mut().unwrap().provider = "MYSPACE".into();
        file.accounts[0]
            .password_hint
            .as_mut()
            .unwrap()
            .requires_special = "SOMETIMES".into();

        let live = deserialize(&file);
        assert_eq!(live.settings.theme, Theme::System);
        assert_eq!(live.settings.region, Region::Global);

        let accounts: Vec<_> = live.accounts.into_iter().map(|a| a.unwrap()).collect();
        assert_eq!(
            accounts[1].sso_hint.as_ref().unwrap().provider,
            SsoProvider::Custom
        );
        assert_eq!(
            accounts[0].password_hint.as_ref().unwrap().requires_special,
            RequirementStatus::Unknown
        );
    }

    #[test]
    fn test_unknown_login_type_fails_only_that_account() {
        let (settings, categories, accounts) = sample_state();
        let mut file = serialize(&settings, &categories, &accounts);
        file.accounts[0].account.login_type = "PASSKEY".into();

        let live = deserialize(&file);
        assert!(live.accounts[0].is_err());
        assert!(live.accounts[1].is_ok());
    }

    #[test]
    fn test_malformed_payload() {
        let err = from_bytes(b"{\"version\":1").unwrap_err();
        assert!(matches!(err, BimilError::Backup(_)));

        let err = from_bytes(b"[1,2,3]").unwrap_err();
        assert!(err.to_string().contains("Malformed backup payload"));
    }
}
