//! Test support for provider adapters.
//!
//! - [`MockedResponse`]: a canned provider profile response
//! - [`OAuth2ProviderHarness`]: drives any adapter through the generic
//!   login contract with a mocked response

pub mod harness;

pub use harness::{MockedResponse, OAuth2ProviderHarness};
