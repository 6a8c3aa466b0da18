//! Facebook login provider.
//!
//! Supports two login methods:
//!
//! - `oauth2` (default): the server-side redirect flow, identical to any
//!   other OAuth2 provider.
//! - `js_sdk`: login through the Facebook JavaScript SDK. The login "URL"
//!   is a `javascript:` call into the client-side integration, and
//!   [`FacebookProvider::media_js`] supplies the context needed to render
//!   the SDK snippet.
//!
//! Re-authentication through the JS SDK is guarded by a single-use nonce
//! kept in the user's session (see [`FacebookProvider::get_nonce`]).

pub mod locale;

use crate::account::ProviderAccount;
use crate::apps::{SocialApp, SocialAppStore};
use crate::config::{AppSettings, LocaleFn, ProviderSettings};
use crate::constants::{NONCE_LENGTH, login_methods, session_keys};
use crate::error::{ProviderError, Result};
use crate::oauth2::{LoginUrlOptions, OAuth2Provider, base_auth_params, build_login_url};
use crate::request::LoginRequest;
use crate::state::{AuthAction, CommonFields, EmailAddress, LoginMethod, SocialAccount};
use crate::utils::{escape_js, json_id, json_str, random_string};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Registry key.
pub const PROVIDER_ID: &str = "facebook";

/// Display name.
pub const PROVIDER_NAME: &str = "Facebook";

const AUTHORIZE_URL: &str = "https://www.facebook.com/dialog/oauth";

/// Facebook login provider.
///
/// # Example
///
/// ```
/// use socialaccount::config::{AppSettings, ProviderSettings};
/// use socialaccount::providers::FacebookProvider;
///
/// let facebook = FacebookProvider::new(
///     ProviderSettings::new().with_method("js_sdk"),
///     AppSettings::default(),
/// );
/// assert_eq!(facebook.get_method(), "js_sdk");
/// ```
#[derive(Debug, Clone)]
pub struct FacebookProvider {
    settings: ProviderSettings,
    app_settings: AppSettings,

    /// Locale callable, resolved on first use.
    locale_callable: OnceLock<LocaleFn>,
}

/// Context for rendering the Facebook JS-SDK integration snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacebookSdkContext {
    /// App credentials (the secret is never serialized).
    pub facebook_app: SocialApp,

    /// Absolute URL of the SDK channel endpoint.
    pub facebook_channel_url: String,

    /// Login options, JSON-encoded for direct embedding in the snippet.
    pub fb_login_options: String,

    /// SDK locale (e.g. `en_US`).
    pub facebook_jssdk_locale: String,
}

impl FacebookProvider {
    /// Create the provider.
    #[must_use]
    pub const fn new(settings: ProviderSettings, app_settings: AppSettings) -> Self {
        Self {
            settings,
            app_settings,
            locale_callable: OnceLock::new(),
        }
    }

    /// Configured login method identifier. Defaults to `oauth2`.
    #[must_use]
    pub fn get_method(&self) -> &str {
        self.settings
            .method
            .as_deref()
            .unwrap_or(login_methods::OAUTH2)
    }

    fn login_method(&self, options: &LoginUrlOptions) -> Result<LoginMethod> {
        options
            .method
            .as_deref()
            .unwrap_or_else(|| self.get_method())
            .parse()
    }

    /// Locale for the JS SDK, from `LOCALE_FUNC` or the default mapping.
    ///
    /// The callable is resolved once per provider instance.
    pub fn get_locale_for_request(&self, request: &LoginRequest) -> String {
        self.locale_callable
            .get_or_init(|| {
                self.settings
                    .locale_func
                    .clone()
                    .unwrap_or_else(locale::default_locale_callable)
            })
            .call(request)
    }

    /// Login options passed to `FB.login`.
    ///
    /// When the configured auth params ask for re-authentication, a session
    /// nonce is attached so the callback can prove freshness.
    pub fn get_fb_login_options(&self, request: &mut LoginRequest) -> BTreeMap<String, String> {
        let mut options = self.get_auth_params(request, AuthAction::Authenticate);
        options.insert("scope".to_string(), self.get_scope().join(","));

        if options.get("auth_type").map(String::as_str) == Some(AuthAction::Reauthenticate.as_str()) {
            if let Some(nonce) = self.get_nonce(request, true, false) {
                options.insert("auth_nonce".to_string(), nonce);
            }
        }

        options
    }

    /// Build the context for the JS-SDK snippet.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ImproperlyConfigured` if no Facebook app is
    /// registered for the request's site, or `ProviderError::Internal` if
    /// the login options cannot be encoded.
    pub fn media_js(
        &self,
        request: &mut LoginRequest,
        apps: &dyn SocialAppStore,
    ) -> Result<FacebookSdkContext> {
        let locale = self.get_locale_for_request(request);
        let app = self.get_app(apps, request).map_err(|_| {
            ProviderError::ImproperlyConfigured(
                "No Facebook app configured: please add a SocialApp for this site".to_string(),
            )
        })?;

        let fb_login_options = serde_json::to_string(&self.get_fb_login_options(request))
            .map_err(|e| ProviderError::Internal(format!("Failed to encode login options: {e}")))?;

        let channel_path = format!(
            "{}/{PROVIDER_ID}/channel/",
            self.app_settings.login_base_path.trim_end_matches('/')
        );

        Ok(FacebookSdkContext {
            facebook_app: app,
            facebook_channel_url: request.build_absolute_uri(&channel_path),
            fb_login_options,
            facebook_jssdk_locale: locale,
        })
    }

    /// Read the re-authentication nonce from the session.
    ///
    /// - `pop`: remove the stored nonce while reading it
    /// - `or_create`: if no nonce is stored, generate and store a new one
    ///
    /// Without `pop`, repeated calls return the same value.
    pub fn get_nonce(&self, request: &mut LoginRequest, or_create: bool, pop: bool) -> Option<String> {
        let session = request.session_mut();
        let nonce = if pop {
            session.remove(session_keys::FACEBOOK_NONCE)
        } else {
            session.get(session_keys::FACEBOOK_NONCE)
        };

        match nonce {
            Some(nonce) if !nonce.is_empty() => Some(nonce),
            _ if or_create => {
                let nonce = random_string(NONCE_LENGTH);
                session.insert(session_keys::FACEBOOK_NONCE, nonce.clone());
                tracing::debug!(provider = self.id(), "Created re-authentication nonce");
                Some(nonce)
            }
            _ => None,
        }
    }

    /// Consume the session nonce and check it against the one echoed back
    /// by the client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NonceMismatch` if no nonce is stored or the
    /// values differ.
    pub fn verify_nonce(&self, request: &mut LoginRequest, presented: &str) -> Result<()> {
        let Some(expected) = self.get_nonce(request, false, true) else {
            tracing::warn!(provider = self.id(), "Re-authentication without a stored nonce");
            return Err(ProviderError::NonceMismatch);
        };

        if constant_time_eq::constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
            Ok(())
        } else {
            tracing::warn!(provider = self.id(), "Re-authentication nonce mismatch");
            Err(ProviderError::NonceMismatch)
        }
    }

    /// Display view over an account linked through Facebook.
    #[must_use]
    pub const fn account<'a>(&self, account: &'a SocialAccount) -> FacebookAccount<'a> {
        FacebookAccount { account }
    }
}

impl OAuth2Provider for FacebookProvider {
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

    fn get_default_scope(&self) -> Vec<String> {
        if self.query_email() {
            vec!["email".to_string()]
        } else {
            Vec::new()
        }
    }

    fn get_auth_params(&self, request: &LoginRequest, action: AuthAction) -> BTreeMap<String, String> {
        let mut params = base_auth_params(self.id(), &self.settings, request);
        if action == AuthAction::Reauthenticate {
            params.insert(
                "auth_type".to_string(),
                AuthAction::Reauthenticate.as_str().to_string(),
            );
        }
        params
    }

    fn get_login_url(&self, _request: &LoginRequest, options: &LoginUrlOptions) -> Result<String> {
        let url = match self.login_method(options)? {
            LoginMethod::JsSdk => {
                let next = escape_js(options.next.as_deref().unwrap_or_default());
                let action = options.action.unwrap_or_default();
                let process = options.process.unwrap_or_default();
                format!(
                    "javascript:allauth.facebook.login('{next}', '{}', '{}')",
                    escape_js(action.as_str()),
                    escape_js(process.as_str())
                )
            }
            LoginMethod::OAuth2 => {
                build_login_url(&self.app_settings.login_base_path, self.id(), options)?
            }
        };

        tracing::debug!(provider = self.id(), "Built login URL");
        Ok(url)
    }

    fn extract_uid(&self, data: &Value) -> Result<String> {
        json_id(data, "id").ok_or_else(|| ProviderError::MissingUid {
            provider: PROVIDER_ID.to_string(),
        })
    }

    fn extract_common_fields(&self, data: &Value) -> CommonFields {
        CommonFields {
            email: json_str(data, "email"),
            username: json_str(data, "username"),
            first_name: json_str(data, "first_name"),
            last_name: json_str(data, "last_name"),
            name: json_str(data, "name"),
        }
    }

    fn extract_email_addresses(&self, data: &Value) -> Vec<EmailAddress> {
        // Facebook's own "verified" flag says nothing about the address.
        json_str(data, "email")
            .map(|email| EmailAddress::new(email, false, true))
            .into_iter()
            .collect()
    }
}

/// Facebook view over a [`SocialAccount`].
#[derive(Debug, Clone, Copy)]
pub struct FacebookAccount<'a> {
    account: &'a SocialAccount,
}

impl ProviderAccount for FacebookAccount<'_> {
    fn account(&self) -> &SocialAccount {
        self.account
    }

    fn brand_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn avatar_url(&self) -> Option<String> {
        Some(format!(
            "https://graph.facebook.com/{}/picture?type=large&return_ssl_resources=1",
            self.account.uid
        ))
    }
}
