//! Social account configuration.
//!
//! Configuration is provided by the application, either through the
//! builder methods or parsed from JSON:
//!
//! ```json
//! {
//!   "QUERY_EMAIL": true,
//!   "PROVIDERS": {
//!     "facebook": { "METHOD": "js_sdk", "SCOPE": ["email", "public_profile"] }
//!   }
//! }
//! ```

use crate::constants::DEFAULT_LOGIN_BASE_PATH;
use crate::error::{ProviderError, Result};
use crate::request::LoginRequest;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Callable mapping a request to a provider locale (e.g. `en_US`).
#[derive(Clone)]
pub struct LocaleFn(Arc<dyn Fn(&LoginRequest) -> String + Send + Sync>);

impl LocaleFn {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&LoginRequest) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callable.
    #[must_use]
    pub fn call(&self, request: &LoginRequest) -> String {
        (self.0)(request)
    }
}

impl fmt::Debug for LocaleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LocaleFn(..)")
    }
}

/// Settings for a single provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ProviderSettings {
    /// Login method (`oauth2` or `js_sdk`). Validated at use.
    pub method: Option<String>,

    /// Scope override. When unset the provider's default scope applies.
    pub scope: Option<Vec<String>>,

    /// Extra parameters passed to the authorize endpoint.
    pub auth_params: BTreeMap<String, String>,

    /// Per-provider override of [`AppSettings::query_email`].
    pub query_email: Option<bool>,

    /// Custom locale callable. Not representable in JSON.
    #[serde(skip)]
    pub locale_func: Option<LocaleFn>,
}

impl ProviderSettings {
    /// Create empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Add an authorize-endpoint parameter.
    #[must_use]
    pub fn with_auth_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_params.insert(key.into(), value.into());
        self
    }

    /// Override whether to ask for the user's email.
    #[must_use]
    pub const fn with_query_email(mut self, query_email: bool) -> Self {
        self.query_email = Some(query_email);
        self
    }

    /// Set a custom locale callable.
    #[must_use]
    pub fn with_locale_func(mut self, f: LocaleFn) -> Self {
        self.locale_func = Some(f);
        self
    }
}

/// Settings shared by every provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AppSettings {
    /// Ask providers for the user's email address.
    ///
    /// Default: false
    pub query_email: bool,

    /// Path the login views are mounted under.
    ///
    /// Default: `/accounts`
    pub login_base_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            query_email: false,
            login_base_path: DEFAULT_LOGIN_BASE_PATH.to_string(),
        }
    }
}

/// Complete configuration for the provider registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct SocialAccountConfig {
    /// Global settings.
    #[serde(flatten)]
    pub app: AppSettings,

    /// Per-provider settings keyed by provider id.
    pub providers: HashMap<String, ProviderSettings>,
}

impl SocialAccountConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ImproperlyConfigured` if the document does
    /// not match the expected layout.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProviderError::ImproperlyConfigured(format!("Invalid configuration: {e}")))
    }

    /// Set the global email query flag.
    #[must_use]
    pub const fn with_query_email(mut self, query_email: bool) -> Self {
        self.app.query_email = query_email;
        self
    }

    /// Set the login base path. A trailing `/` is dropped.
    #[must_use]
    pub fn with_login_base_path(mut self, path: impl Into<String>) -> Self {
        let mut path = path.into();
        while path.ends_with('/') {
            path.pop();
        }
        self.app.login_base_path = path;
        self
    }

    /// Set the settings for one provider.
    #[must_use]
    pub fn with_provider(mut self, id: impl Into<String>, settings: ProviderSettings) -> Self {
        self.providers.insert(id.into(), settings);
        self
    }

    /// Settings for `id`, or defaults when none were configured.
    #[must_use]
    pub fn settings_for(&self, id: &str) -> ProviderSettings {
        self.providers.get(id).cloned().unwrap_or_default()
    }
}
