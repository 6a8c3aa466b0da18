//! Provider registry.
//!
//! The registry maps provider ids to adapters. It is built once from
//! configuration at startup and only read afterwards:
//!
//! ```
//! use socialaccount::config::SocialAccountConfig;
//! use socialaccount::oauth2::OAuth2Provider;
//! use socialaccount::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&SocialAccountConfig::default())?;
//! assert_eq!(registry.by_id("facebook")?.name(), "Facebook");
//! # Ok::<(), socialaccount::ProviderError>(())
//! ```
//!
//! Hosts that prefer a process-wide instance call [`install`] once and
//! read it back through [`global`].

use crate::account::ProviderAccount;
use crate::apps::{SocialApp, SocialAppStore};
use crate::config::{AppSettings, ProviderSettings, SocialAccountConfig};
use crate::error::{ProviderError, Result};
use crate::oauth2::{LoginUrlOptions, OAuth2Provider};
use crate::providers::{DoubanProvider, FacebookProvider, douban, facebook};
use crate::request::LoginRequest;
use crate::state::{AuthAction, CommonFields, EmailAddress, SocialAccount};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One of the bundled provider adapters.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Facebook.
    Facebook(FacebookProvider),
    /// Douban.
    Douban(DoubanProvider),
}

impl Provider {
    fn inner(&self) -> &dyn OAuth2Provider {
        match self {
            Self::Facebook(p) => p,
            Self::Douban(p) => p,
        }
    }

    /// The Facebook adapter, if this is one.
    #[must_use]
    pub const fn as_facebook(&self) -> Option<&FacebookProvider> {
        match self {
            Self::Facebook(p) => Some(p),
            Self::Douban(_) => None,
        }
    }

    /// The Douban adapter, if this is one.
    #[must_use]
    pub const fn as_douban(&self) -> Option<&DoubanProvider> {
        match self {
            Self::Douban(p) => Some(p),
            Self::Facebook(_) => None,
        }
    }

    /// Provider-specific display view over `account`.
    #[must_use]
    pub fn account_view<'a>(&self, account: &'a SocialAccount) -> Box<dyn ProviderAccount + 'a> {
        match self {
            Self::Facebook(p) => Box::new(p.account(account)),
            Self::Douban(p) => Box::new(p.account(account)),
        }
    }
}

impl From<FacebookProvider> for Provider {
    fn from(p: FacebookProvider) -> Self {
        Self::Facebook(p)
    }
}

impl From<DoubanProvider> for Provider {
    fn from(p: DoubanProvider) -> Self {
        Self::Douban(p)
    }
}

impl OAuth2Provider for Provider {
    fn id(&self) -> &'static str {
        self.inner().id()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn settings(&self) -> &ProviderSettings {
        self.inner().settings()
    }

    fn app_settings(&self) -> &AppSettings {
        self.inner().app_settings()
    }

    fn authorize_url(&self) -> &'static str {
        self.inner().authorize_url()
    }

    fn scope_delimiter(&self) -> &'static str {
        self.inner().scope_delimiter()
    }

    fn get_default_scope(&self) -> Vec<String> {
        self.inner().get_default_scope()
    }

    fn get_scope(&self) -> Vec<String> {
        self.inner().get_scope()
    }

    fn get_auth_params(&self, request: &LoginRequest, action: AuthAction) -> BTreeMap<String, String> {
        self.inner().get_auth_params(request, action)
    }

    fn get_login_url(&self, request: &LoginRequest, options: &LoginUrlOptions) -> Result<String> {
        self.inner().get_login_url(request, options)
    }

    fn extract_uid(&self, data: &Value) -> Result<String> {
        self.inner().extract_uid(data)
    }

    fn extract_common_fields(&self, data: &Value) -> CommonFields {
        self.inner().extract_common_fields(data)
    }

    fn extract_email_addresses(&self, data: &Value) -> Vec<EmailAddress> {
        self.inner().extract_email_addresses(data)
    }

    fn extract_extra_data(&self, data: &Value) -> Value {
        self.inner().extract_extra_data(data)
    }

    fn get_app(&self, apps: &dyn SocialAppStore, request: &LoginRequest) -> Result<SocialApp> {
        self.inner().get_app(apps, request)
    }
}

/// Lookup table of provider adapters keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<&'static str, Provider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every bundled adapter, configured from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::DuplicateProvider` if two adapters share an id.
    pub fn from_config(config: &SocialAccountConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(FacebookProvider::new(
            config.settings_for(facebook::PROVIDER_ID),
            config.app.clone(),
        ))?;
        registry.register(DoubanProvider::new(
            config.settings_for(douban::PROVIDER_ID),
            config.app.clone(),
        ))?;

        for id in config.providers.keys() {
            if !registry.providers.contains_key(id.as_str()) {
                tracing::warn!(provider = %id, "Settings given for unknown provider");
            }
        }

        Ok(registry)
    }

    /// Register an adapter under its id.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::DuplicateProvider` if the id is taken.
    pub fn register(&mut self, provider: impl Into<Provider>) -> Result<()> {
        let provider = provider.into();
        let id = provider.id();
        if self.providers.contains_key(id) {
            return Err(ProviderError::DuplicateProvider(id.to_string()));
        }

        tracing::debug!(provider = id, "Registered provider");
        self.providers.insert(id, provider);
        Ok(())
    }

    /// Look up an adapter.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// Look up an adapter that must exist.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownProvider` if nothing is registered
    /// under `id`.
    pub fn by_id(&self, id: &str) -> Result<&Provider> {
        self.get(id)
            .ok_or_else(|| ProviderError::UnknownProvider(id.to_string()))
    }

    /// All adapters, ordered by id.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// All registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

static GLOBAL_REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();

/// Build the process-wide registry from `config` and install it.
///
/// # Errors
///
/// Returns `ProviderError::ImproperlyConfigured` if a registry is already
/// installed, or any error from [`ProviderRegistry::from_config`].
pub fn install(config: &SocialAccountConfig) -> Result<&'static ProviderRegistry> {
    let registry = ProviderRegistry::from_config(config)?;
    GLOBAL_REGISTRY.set(registry).map_err(|_| {
        ProviderError::ImproperlyConfigured("Provider registry already installed".to_string())
    })?;

    GLOBAL_REGISTRY
        .get()
        .ok_or_else(|| ProviderError::Internal("Provider registry missing after install".to_string()))
}

/// The process-wide registry, if [`install`] has run.
#[must_use]
pub fn global() -> Option<&'static ProviderRegistry> {
    GLOBAL_REGISTRY.get()
}
