//! Constants shared by the provider adapters.

/// Session keys owned by the adapters.
pub mod session_keys {
    /// Facebook re-authentication nonce.
    pub const FACEBOOK_NONCE: &str = "allauth_facebook_nonce";
}

/// Length of generated nonces, in characters.
pub const NONCE_LENGTH: usize = 32;

/// Default mount point of the login views.
pub const DEFAULT_LOGIN_BASE_PATH: &str = "/accounts";

/// Login method identifiers accepted in provider settings.
pub mod login_methods {
    /// Server-side OAuth2 redirect flow.
    pub const OAUTH2: &str = "oauth2";

    /// Client-side login through the provider's JavaScript SDK.
    pub const JS_SDK: &str = "js_sdk";
}
