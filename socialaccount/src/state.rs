//! Normalized account model shared by every provider.
//!
//! Provider payloads are mapped into these types and never leak past the
//! adapter. Everything here is owned by the host once returned.

use crate::constants::login_methods;
use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the login is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProcess {
    /// Sign in (or sign up) with the external account.
    #[default]
    Login,
    /// Connect the external account to the current user.
    Connect,
    /// Redirect-only flow (no local account changes).
    Redirect,
}

impl AuthProcess {
    /// Get the process name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Connect => "connect",
            Self::Redirect => "redirect",
        }
    }
}

impl fmt::Display for AuthProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the provider should do with an already signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    /// Regular authentication; the provider may skip its login prompt.
    #[default]
    Authenticate,
    /// Force the user to re-enter credentials at the provider.
    Reauthenticate,
}

impl AuthAction {
    /// Get the action name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Reauthenticate => "reauthenticate",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the login is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoginMethod {
    /// Server-side redirect through the OAuth2 authorize endpoint.
    #[default]
    OAuth2,
    /// Client-side login through the provider's JavaScript SDK.
    JsSdk,
}

impl LoginMethod {
    /// Get the method identifier as used in settings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OAuth2 => login_methods::OAUTH2,
            Self::JsSdk => login_methods::JS_SDK,
        }
    }
}

impl FromStr for LoginMethod {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            login_methods::OAUTH2 => Ok(Self::OAuth2),
            login_methods::JS_SDK => Ok(Self::JsSdk),
            other => Err(ProviderError::UnsupportedLoginMethod(other.to_string())),
        }
    }
}

/// Provider-independent profile fields.
///
/// All fields are optional; providers leave out what they do not expose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonFields {
    /// Email address as declared by the provider.
    pub email: Option<String>,

    /// Preferred username.
    pub username: Option<String>,

    /// Given name.
    pub first_name: Option<String>,

    /// Family name.
    pub last_name: Option<String>,

    /// Full display name.
    pub name: Option<String>,
}

/// Email address record handed to the host's account layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// The address.
    pub email: String,

    /// Whether ownership of the address has been proven.
    pub verified: bool,

    /// Whether this is the user's primary address.
    pub primary: bool,
}

impl EmailAddress {
    /// Create an email record.
    #[must_use]
    pub fn new(email: impl Into<String>, verified: bool, primary: bool) -> Self {
        Self {
            email: email.into(),
            verified,
            primary,
        }
    }
}

/// External account linked through a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAccount {
    /// Provider id (registry key).
    pub provider: String,

    /// Stable account identifier at the provider.
    pub uid: String,

    /// Raw provider payload, kept for display purposes.
    pub extra_data: serde_json::Value,
}

impl SocialAccount {
    /// Read a string field from `extra_data`.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra_data.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Result of normalizing one provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLogin {
    /// The external account.
    pub account: SocialAccount,

    /// Normalized profile fields.
    pub common_fields: CommonFields,

    /// Email records (zero or one for the bundled providers).
    pub email_addresses: Vec<EmailAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_method_parsing() {
        assert_eq!("oauth2".parse::<LoginMethod>(), Ok(LoginMethod::OAuth2));
        assert_eq!("js_sdk".parse::<LoginMethod>(), Ok(LoginMethod::JsSdk));
        assert_eq!(
            "popup".parse::<LoginMethod>(),
            Err(ProviderError::UnsupportedLoginMethod("popup".to_string()))
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AuthProcess::default(), AuthProcess::Login);
        assert_eq!(AuthAction::default(), AuthAction::Authenticate);
        assert_eq!(LoginMethod::default().as_str(), "oauth2");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&AuthAction::Reauthenticate).unwrap(),
            "\"reauthenticate\""
        );
        assert_eq!(
            serde_json::from_str::<AuthProcess>("\"connect\"").unwrap(),
            AuthProcess::Connect
        );
    }

    #[test]
    fn test_extra_str() {
        let account = SocialAccount {
            provider: "facebook".to_string(),
            uid: "1".to_string(),
            extra_data: serde_json::json!({"name": "Ann", "age": 3}),
        };
        assert_eq!(account.extra_str("name"), Some("Ann"));
        assert_eq!(account.extra_str("age"), None);
        assert_eq!(account.extra_str("missing"), None);
    }
}
