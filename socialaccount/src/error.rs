//! Error types for provider adapters.

use thiserror::Error;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failure modes of the provider adapters.
///
/// Configuration errors are fatal to the request that hit them and are
/// never retried. Missing optional profile fields are not errors at all;
/// they normalize to `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    // ═══════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════

    /// Required configuration is missing (e.g. no app for the current site).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// The configured login method is not one the provider understands.
    #[error("Unsupported login method: {0}")]
    UnsupportedLoginMethod(String),

    /// No provider is registered under this id.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A provider with this id is already registered.
    #[error("Provider already registered: {0}")]
    DuplicateProvider(String),

    // ═══════════════════════════════════════════════════════════
    // Payload Errors
    // ═══════════════════════════════════════════════════════════

    /// The provider payload carries no usable account identifier.
    #[error("Missing account uid in {provider} response")]
    MissingUid {
        /// Provider id
        provider: String,
    },

    /// The provider payload could not be parsed.
    #[error("Invalid provider payload: {0}")]
    InvalidPayload(String),

    /// The provider answered the profile request with a non-success status.
    #[error("Profile request failed with status {status}")]
    ProfileFetchFailed {
        /// HTTP status returned by the provider
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════
    // Security Errors
    // ═══════════════════════════════════════════════════════════

    /// The re-authentication nonce was missing or did not match.
    #[error("Re-authentication nonce mismatch")]
    NonceMismatch,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Internal error (encoding failures and the like).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Returns `true` if this error stems from deployment configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use socialaccount::ProviderError;
    /// assert!(ProviderError::ImproperlyConfigured("no app".into()).is_configuration_error());
    /// assert!(!ProviderError::NonceMismatch.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ImproperlyConfigured(_)
                | Self::UnsupportedLoginMethod(_)
                | Self::UnknownProvider(_)
                | Self::DuplicateProvider(_)
        )
    }

    /// Returns `true` if this error indicates a security issue.
    ///
    /// # Examples
    ///
    /// ```
    /// # use socialaccount::ProviderError;
    /// assert!(ProviderError::NonceMismatch.is_security_issue());
    /// assert!(!ProviderError::UnknownProvider("x".into()).is_security_issue());
    /// ```
    #[must_use]
    pub const fn is_security_issue(&self) -> bool {
        matches!(self, Self::NonceMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProviderError::UnsupportedLoginMethod("popup".to_string()).to_string(),
            "Unsupported login method: popup"
        );
        assert_eq!(
            ProviderError::MissingUid {
                provider: "facebook".to_string()
            }
            .to_string(),
            "Missing account uid in facebook response"
        );
    }

    #[test]
    fn test_classification() {
        assert!(ProviderError::UnknownProvider("x".to_string()).is_configuration_error());
        assert!(!ProviderError::InvalidPayload("x".to_string()).is_configuration_error());
        assert!(!ProviderError::Internal("x".to_string()).is_security_issue());
    }
}
