//! # Social account provider adapters
//!
//! Adapters that let a web application accept logins from external
//! identity providers over OAuth2. Each adapter turns a provider's profile
//! payload into a normalized account and builds the provider's login
//! URLs.
//!
//! ## Bundled providers
//!
//! - **Facebook**: OAuth2 redirect or JS-SDK login, nonce-guarded
//!   re-authentication
//! - **Douban**: OAuth2 redirect
//!
//! ## Architecture
//!
//! ```text
//! SocialAccountConfig ──► ProviderRegistry ──► Provider (by id)
//!                                                 │
//!        LoginRequest (session, site) ───────────►│ get_login_url / media_js
//!        profile JSON ───────────────────────────►│ sociallogin_from_response
//!                                                 ▼
//!                                            SocialLogin
//! ```
//!
//! The OAuth2 handshake, token storage and template rendering belong to
//! the host; the adapters only see the request context and the profile
//! payload.
//!
//! ## Example: normalize a Facebook profile
//!
//! ```
//! use socialaccount::config::SocialAccountConfig;
//! use socialaccount::oauth2::OAuth2Provider;
//! use socialaccount::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&SocialAccountConfig::default())?;
//! let facebook = registry.by_id("facebook")?;
//!
//! let payload = serde_json::json!({"id": "630595557", "email": "ray@example.com"});
//! let login = facebook.sociallogin_from_response(&payload)?;
//!
//! assert_eq!(login.account.uid, "630595557");
//! assert!(!login.email_addresses[0].verified);
//! # Ok::<(), socialaccount::ProviderError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod account;
pub mod apps;
pub mod config;
pub mod constants;
pub mod error;
pub mod oauth2;
pub mod providers;
pub mod registry;
pub mod request;
pub mod session;
pub mod state;
pub mod utils;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use error::{ProviderError, Result};
pub use oauth2::{LoginUrlOptions, OAuth2Provider};
pub use registry::{Provider, ProviderRegistry};
pub use request::LoginRequest;
pub use state::{AuthAction, AuthProcess, CommonFields, EmailAddress, SocialAccount, SocialLogin};
