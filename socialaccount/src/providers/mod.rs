//! Bundled provider adapters.
//!
//! Each adapter implements [`OAuth2Provider`](crate::oauth2::OAuth2Provider)
//! and is registered in the [`ProviderRegistry`](crate::registry::ProviderRegistry)
//! under its id.

pub mod douban;
pub mod facebook;

pub use douban::{DoubanAccount, DoubanProvider};
pub use facebook::{FacebookAccount, FacebookProvider, FacebookSdkContext};
