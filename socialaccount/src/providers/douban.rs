//! Douban login provider.

use crate::account::ProviderAccount;
use crate::config::{AppSettings, ProviderSettings};
use crate::error::{ProviderError, Result};
use crate::oauth2::OAuth2Provider;
use crate::state::{CommonFields, SocialAccount};
use crate::utils::{json_id, json_str};
use serde_json::Value;

/// Registry key.
pub const PROVIDER_ID: &str = "douban";

/// Display name.
pub const PROVIDER_NAME: &str = "Douban";

const AUTHORIZE_URL: &str = "https://www.douban.com/service/auth2/auth";

/// Douban login provider.
///
/// Douban exposes no email address, so logins through it never carry
/// email records.
#[derive(Debug, Clone)]
pub struct DoubanProvider {
    settings: ProviderSettings,
    app_settings: AppSettings,
}

impl DoubanProvider {
    /// Create the provider.
    #[must_use]
    pub const fn new(settings: ProviderSettings, app_settings: AppSettings) -> Self {
        Self {
            settings,
            app_settings,
        }
    }

    /// Display view over an account linked through Douban.
    #[must_use]
    pub const fn account<'a>(&self, account: &'a SocialAccount) -> DoubanAccount<'a> {
        DoubanAccount { account }
    }
}

impl OAuth2Provider for DoubanProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn app_settings(&self) -> &AppSettings {
        &self.app_settings
    }

    fn authorize_url(&self) -> &'static str {
        AUTHORIZE_URL
    }

    fn extract_uid(&self, data: &Value) -> Result<String> {
        // `uid` is the user-chosen handle and can change; `id` is numeric and stable.
        json_id(data, "id").ok_or_else(|| ProviderError::MissingUid {
            provider: PROVIDER_ID.to_string(),
        })
    }

    fn extract_common_fields(&self, data: &Value) -> CommonFields {
        CommonFields {
            username: json_str(data, "uid"),
            name: json_str(data, "name"),
            ..CommonFields::default()
        }
    }
}

/// Douban view over a [`SocialAccount`].
#[derive(Debug, Clone, Copy)]
pub struct DoubanAccount<'a> {
    account: &'a SocialAccount,
}

impl ProviderAccount for DoubanAccount<'_> {
    fn account(&self) -> &SocialAccount {
        self.account
    }

    fn brand_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn profile_url(&self) -> Option<String> {
        self.account.extra_str("alt").map(str::to_string)
    }

    fn avatar_url(&self) -> Option<String> {
        self.account
            .extra_str("large_avatar")
            .or_else(|| self.account.extra_str("avatar"))
            .map(str::to_string)
    }
}

/// Canned Douban `/v2/user/~me` response.
#[cfg(any(test, feature = "test-utils"))]
pub const MOCKED_PROFILE_RESPONSE: &str = r#"{"name": "guoqiao", "created": "2009-02-18 01:07:52", "is_suicide": false, "alt": "http://www.douban.com/people/qguo/", "avatar": "http://img3.douban.com/icon/u3659811-3.jpg", "signature": "", "uid": "qguo", "is_banned": false, "desc": "不是很爱读书", "type": "user", "id": "3659811", "large_avatar": "http://img3.douban.com/icon/up3659811-3.jpg"}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DoubanProvider {
        DoubanProvider::new(ProviderSettings::new(), AppSettings::default())
    }

    fn fixture() -> Value {
        serde_json::from_str(MOCKED_PROFILE_RESPONSE).unwrap()
    }

    #[test]
    fn test_extract_uid_uses_numeric_id() {
        assert_eq!(provider().extract_uid(&fixture()).unwrap(), "3659811");
    }

    #[test]
    fn test_extract_common_fields() {
        let fields = provider().extract_common_fields(&fixture());
        assert_eq!(fields.username.as_deref(), Some("qguo"));
        assert_eq!(fields.name.as_deref(), Some("guoqiao"));
        assert_eq!(fields.email, None);
    }

    #[test]
    fn test_no_email_addresses() {
        assert!(provider().extract_email_addresses(&fixture()).is_empty());
    }

    #[test]
    fn test_no_default_scope() {
        assert!(provider().get_scope().is_empty());
    }

    #[test]
    fn test_account_view() {
        let provider = provider();
        let login = provider.sociallogin_from_response(&fixture()).unwrap();
        let view = provider.account(&login.account);

        assert_eq!(
            view.profile_url().as_deref(),
            Some("http://www.douban.com/people/qguo/")
        );
        assert_eq!(
            view.avatar_url().as_deref(),
            Some("http://img3.douban.com/icon/up3659811-3.jpg")
        );
        assert_eq!(view.to_str(), "guoqiao");
        assert_eq!(
            login.account.extra_str("desc"),
            Some("\u{4e0d}\u{662f}\u{5f88}\u{7231}\u{8bfb}\u{4e66}")
        );
    }

    #[test]
    fn test_avatar_falls_back_to_small_avatar() {
        let provider = provider();
        let account = SocialAccount {
            provider: PROVIDER_ID.to_string(),
            uid: "1".to_string(),
            extra_data: serde_json::json!({"avatar": "http://img3.douban.com/icon/u1.jpg"}),
        };
        let view = provider.account(&account);
        assert_eq!(
            view.avatar_url().as_deref(),
            Some("http://img3.douban.com/icon/u1.jpg")
        );
        assert_eq!(view.to_str(), "Douban");
    }
}
