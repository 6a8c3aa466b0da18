//! Generic OAuth2 adapter harness.

use crate::error::{ProviderError, Result};
use crate::oauth2::{LoginUrlOptions, OAuth2Provider};
use crate::request::LoginRequest;
use crate::state::{AuthProcess, SocialLogin};
use serde_json::Value;

/// Canned HTTP response from a provider's profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockedResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body.
    pub body: String,
}

impl MockedResponse {
    /// Create a mocked response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A `200 OK` response with `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ProfileFetchFailed` for a non-2xx status, or
    /// `ProviderError::InvalidPayload` if the body is not JSON.
    pub fn json(&self) -> Result<Value> {
        if !(200..300).contains(&self.status) {
            return Err(ProviderError::ProfileFetchFailed {
                status: self.status,
            });
        }

        serde_json::from_str(&self.body).map_err(|e| ProviderError::InvalidPayload(e.to_string()))
    }
}

/// Runs an adapter through the parts of the OAuth2 login flow that do
/// not touch the network.
///
/// # Example
///
/// ```
/// use socialaccount::config::SocialAccountConfig;
/// use socialaccount::mocks::{MockedResponse, OAuth2ProviderHarness};
/// use socialaccount::providers::douban::MOCKED_PROFILE_RESPONSE;
/// use socialaccount::registry::ProviderRegistry;
///
/// let registry = ProviderRegistry::from_config(&SocialAccountConfig::default())?;
/// let harness = OAuth2ProviderHarness::new(registry.by_id("douban")?);
/// let login = harness.login(&MockedResponse::ok(MOCKED_PROFILE_RESPONSE))?;
/// assert_eq!(login.account.uid, "3659811");
/// # Ok::<(), socialaccount::ProviderError>(())
/// ```
pub struct OAuth2ProviderHarness<'a> {
    provider: &'a dyn OAuth2Provider,
}

impl<'a> OAuth2ProviderHarness<'a> {
    /// Wrap an adapter.
    #[must_use]
    pub fn new(provider: &'a dyn OAuth2Provider) -> Self {
        Self { provider }
    }

    /// Normalize a mocked profile response and check the adapter contract.
    ///
    /// Checked:
    /// - the uid is non-empty and identical across repeated normalization
    /// - the account is tagged with the adapter's id
    /// - at most one email record is produced, and it is primary
    ///
    /// # Errors
    ///
    /// Returns the adapter's error, a response error from
    /// [`MockedResponse::json`], or `ProviderError::Internal` describing the
    /// violated contract.
    pub fn login(&self, response: &MockedResponse) -> Result<SocialLogin> {
        let data = response.json()?;
        let login = self.provider.sociallogin_from_response(&data)?;

        let again = self.provider.sociallogin_from_response(&data)?;
        if again.account.uid != login.account.uid {
            return Err(self.violation("uid is not stable"));
        }

        if login.account.provider != self.provider.id() {
            return Err(self.violation("account tagged with the wrong provider"));
        }

        if login.email_addresses.len() > 1 {
            return Err(self.violation("more than one email address"));
        }

        if login.email_addresses.iter().any(|e| !e.primary) {
            return Err(self.violation("email address is not primary"));
        }

        Ok(login)
    }

    /// Login URL for a plain login process, as the provider buttons use.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the URL cannot be built.
    pub fn login_url(&self, request: &LoginRequest) -> Result<String> {
        let options = LoginUrlOptions::new().with_process(AuthProcess::Login);
        self.provider.get_login_url(request, &options)
    }

    fn violation(&self, what: &str) -> ProviderError {
        ProviderError::Internal(format!("{} adapter contract violated: {what}", self.provider.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, ProviderSettings};
    use crate::providers::FacebookProvider;
    use crate::providers::douban::{DoubanProvider, MOCKED_PROFILE_RESPONSE};
    use crate::session::InMemorySession;

    #[test]
    fn test_mocked_response_json() {
        assert!(MockedResponse::ok("{}").json().unwrap().is_object());
        assert_eq!(
            MockedResponse::new(500, "{}").json(),
            Err(ProviderError::ProfileFetchFailed { status: 500 })
        );
        assert!(matches!(
            MockedResponse::ok("not json").json(),
            Err(ProviderError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_douban_login() {
        let douban = DoubanProvider::new(ProviderSettings::new(), AppSettings::default());
        let harness = OAuth2ProviderHarness::new(&douban);

        let login = harness.login(&MockedResponse::ok(MOCKED_PROFILE_RESPONSE)).unwrap();
        assert_eq!(login.account.uid, "3659811");
        assert_eq!(login.account.provider, "douban");
    }

    #[test]
    fn test_missing_uid_is_reported() {
        let facebook = FacebookProvider::new(ProviderSettings::new(), AppSettings::default());
        let harness = OAuth2ProviderHarness::new(&facebook);

        let result = harness.login(&MockedResponse::ok(r#"{"name": "nobody"}"#));
        assert!(matches!(result, Err(ProviderError::MissingUid { .. })));
    }

    #[test]
    fn test_login_url() {
        let douban = DoubanProvider::new(ProviderSettings::new(), AppSettings::default());
        let harness = OAuth2ProviderHarness::new(&douban);
        let request = LoginRequest::new("http://localhost", InMemorySession::new());

        assert_eq!(
            harness.login_url(&request).unwrap(),
            "/accounts/douban/login/?process=login"
        );
    }
}
