//! Generic OAuth2 provider contract.
//!
//! Every adapter implements [`OAuth2Provider`]. The trait carries the
//! behavior shared by all OAuth2 providers as default methods (scope
//! resolution, auth params, login and authorize URLs, normalization of a
//! profile response); adapters override only what their provider does
//! differently.
//!
//! # Flow
//!
//! ```text
//! get_login_url ──► host login view ──► build_authorization_url ──► provider
//!                                                                     │
//! SocialLogin ◄── sociallogin_from_response ◄── profile JSON ◄────────┘
//! ```

use crate::apps::{SocialApp, SocialAppStore};
use crate::config::{AppSettings, ProviderSettings};
use crate::error::{ProviderError, Result};
use crate::request::LoginRequest;
use crate::state::{AuthAction, AuthProcess, CommonFields, EmailAddress, SocialAccount, SocialLogin};
use serde_json::Value;
use std::collections::BTreeMap;

/// Options accepted by [`OAuth2Provider::get_login_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginUrlOptions {
    /// Login or connect.
    pub process: Option<AuthProcess>,

    /// Where to send the user after login.
    pub next: Option<String>,

    /// Authenticate or re-authenticate.
    pub action: Option<AuthAction>,

    /// Scope override, passed through to the login view.
    pub scope: Option<String>,

    /// Extra authorize parameters, url-encoded.
    pub auth_params: Option<String>,

    /// Login method override (`oauth2` / `js_sdk`). Never encoded in URLs.
    pub method: Option<String>,
}

impl LoginUrlOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the process.
    #[must_use]
    pub const fn with_process(mut self, process: AuthProcess) -> Self {
        self.process = Some(process);
        self
    }

    /// Set the post-login redirect.
    #[must_use]
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Set the action.
    #[must_use]
    pub const fn with_action(mut self, action: AuthAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the scope override.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the extra authorize parameters.
    #[must_use]
    pub fn with_auth_params(mut self, auth_params: impl Into<String>) -> Self {
        self.auth_params = Some(auth_params.into());
        self
    }

    /// Override the login method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Build the URL of the host's login view for `provider_id`.
///
/// Non-empty options are appended as a query string in a fixed order:
/// `process`, `next`, `action`, `scope`, `auth_params`.
///
/// # Errors
///
/// Returns `ProviderError::Internal` if the query cannot be encoded.
///
/// # Examples
///
/// ```
/// use socialaccount::oauth2::{build_login_url, LoginUrlOptions};
///
/// let url = build_login_url("/accounts", "facebook", &LoginUrlOptions::new().with_next("/home"))?;
/// assert_eq!(url, "/accounts/facebook/login/?next=%2Fhome");
/// # Ok::<(), socialaccount::ProviderError>(())
/// ```
pub fn build_login_url(
    base_path: &str,
    provider_id: &str,
    options: &LoginUrlOptions,
) -> Result<String> {
    let path = format!("{}/{provider_id}/login/", base_path.trim_end_matches('/'));

    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some(process) = options.process {
        params.push(("process", process.as_str()));
    }
    if let Some(next) = options.next.as_deref().filter(|s| !s.is_empty()) {
        params.push(("next", next));
    }
    if let Some(action) = options.action {
        params.push(("action", action.as_str()));
    }
    if let Some(scope) = options.scope.as_deref().filter(|s| !s.is_empty()) {
        params.push(("scope", scope));
    }
    if let Some(auth_params) = options.auth_params.as_deref().filter(|s| !s.is_empty()) {
        params.push(("auth_params", auth_params));
    }

    if params.is_empty() {
        return Ok(path);
    }

    let query = serde_urlencoded::to_string(&params)
        .map_err(|e| ProviderError::Internal(format!("Failed to build URL: {e}")))?;

    Ok(format!("{path}?{query}"))
}

/// Authorize parameters shared by all providers.
///
/// Configured `AUTH_PARAMS` merged with the url-encoded `auth_params`
/// query parameter of the request, the latter winning. A malformed query
/// value is ignored.
#[must_use]
pub fn base_auth_params(
    provider_id: &str,
    settings: &ProviderSettings,
    request: &LoginRequest,
) -> BTreeMap<String, String> {
    let mut params = settings.auth_params.clone();

    if let Some(dynamic) = request.query_param("auth_params") {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(dynamic) {
            Ok(pairs) => params.extend(pairs),
            Err(e) => {
                tracing::debug!(provider = provider_id, "Ignoring malformed auth_params: {e}");
            }
        }
    }

    params
}

/// OAuth2 login provider.
///
/// # Implementation Notes
///
/// - `extract_uid` must be stable across logins of the same account
/// - Missing optional profile fields map to `None`, never to errors
/// - Implementations are shared across requests and must not hold
///   per-request state
pub trait OAuth2Provider: Send + Sync {
    /// Registry key (e.g. `"facebook"`).
    fn id(&self) -> &'static str;

    /// Display name (e.g. `"Facebook"`).
    fn name(&self) -> &'static str;

    /// Settings for this provider.
    fn settings(&self) -> &ProviderSettings;

    /// Settings shared by all providers.
    fn app_settings(&self) -> &AppSettings;

    /// The provider's OAuth2 authorize endpoint.
    fn authorize_url(&self) -> &'static str;

    /// Separator used when sending the scope to the authorize endpoint.
    fn scope_delimiter(&self) -> &'static str {
        " "
    }

    /// Whether to ask for the user's email address.
    fn query_email(&self) -> bool {
        self.settings()
            .query_email
            .unwrap_or(self.app_settings().query_email)
    }

    /// Scope requested when none is configured.
    fn get_default_scope(&self) -> Vec<String> {
        Vec::new()
    }

    /// Effective scope: the configured `SCOPE`, else the default scope.
    fn get_scope(&self) -> Vec<String> {
        self.settings()
            .scope
            .clone()
            .unwrap_or_else(|| self.get_default_scope())
    }

    /// Parameters for the authorize endpoint. See [`base_auth_params`].
    fn get_auth_params(&self, request: &LoginRequest, _action: AuthAction) -> BTreeMap<String, String> {
        base_auth_params(self.id(), self.settings(), request)
    }

    /// URL that starts a login with this provider.
    ///
    /// # Errors
    ///
    /// Returns error if the URL cannot be built or the requested login
    /// method is not supported.
    fn get_login_url(&self, _request: &LoginRequest, options: &LoginUrlOptions) -> Result<String> {
        build_login_url(&self.app_settings().login_base_path, self.id(), options)
    }

    /// Stable account identifier from the provider payload.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingUid` if the payload has no identifier.
    fn extract_uid(&self, data: &Value) -> Result<String>;

    /// Normalized profile fields from the provider payload.
    fn extract_common_fields(&self, data: &Value) -> CommonFields;

    /// Email records from the provider payload.
    fn extract_email_addresses(&self, _data: &Value) -> Vec<EmailAddress> {
        Vec::new()
    }

    /// Data stored alongside the account. Defaults to the whole payload.
    fn extract_extra_data(&self, data: &Value) -> Value {
        data.clone()
    }

    /// Normalize a profile response into a [`SocialLogin`].
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingUid` if no non-empty uid can be
    /// extracted.
    fn sociallogin_from_response(&self, data: &Value) -> Result<SocialLogin> {
        let uid = self.extract_uid(data)?;
        if uid.is_empty() {
            return Err(ProviderError::MissingUid {
                provider: self.id().to_string(),
            });
        }

        Ok(SocialLogin {
            account: SocialAccount {
                provider: self.id().to_string(),
                uid,
                extra_data: self.extract_extra_data(data),
            },
            common_fields: self.extract_common_fields(data),
            email_addresses: self.extract_email_addresses(data),
        })
    }

    /// App credentials for the request's site.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ImproperlyConfigured` if no app is
    /// registered for this provider and site.
    fn get_app(&self, apps: &dyn SocialAppStore, request: &LoginRequest) -> Result<SocialApp> {
        apps.find(self.id(), request.site_id()).ok_or_else(|| {
            tracing::warn!(
                provider = self.id(),
                site = request.site_id().0,
                "No app configured for provider"
            );
            ProviderError::ImproperlyConfigured(format!(
                "No {} app configured: please add a SocialApp for site {}",
                self.name(),
                request.site_id().0
            ))
        })
    }

    /// Redirect URL to the provider's authorize endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the query cannot be encoded.
    fn build_authorization_url(
        &self,
        app: &SocialApp,
        redirect_uri: &str,
        state: &str,
        request: &LoginRequest,
        action: AuthAction,
    ) -> Result<String> {
        let scope = self.get_scope().join(self.scope_delimiter());
        let auth_params = self.get_auth_params(request, action);

        let mut params = vec![
            ("client_id", app.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("response_type", "code"),
            ("state", state),
        ];
        params.extend(auth_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| ProviderError::Internal(format!("Failed to build URL: {e}")))?;

        tracing::debug!(provider = self.id(), "Built authorization URL");

        Ok(format!("{}?{query}", self.authorize_url()))
    }
}
