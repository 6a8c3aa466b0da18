//! Display view over a linked social account.

use crate::state::SocialAccount;

/// Provider-specific presentation of a [`SocialAccount`].
///
/// Each adapter wraps the stored account in its own view to expose the
/// profile link, avatar and a display string.
pub trait ProviderAccount {
    /// The wrapped account.
    fn account(&self) -> &SocialAccount;

    /// Provider display name (e.g. "Facebook").
    fn brand_name(&self) -> &'static str;

    /// Link to the user's public profile at the provider.
    ///
    /// Defaults to the `link` field of the stored profile.
    fn profile_url(&self) -> Option<String> {
        self.account().extra_str("link").map(str::to_string)
    }

    /// Link to the user's avatar image.
    fn avatar_url(&self) -> Option<String> {
        None
    }

    /// Human-readable label for the account: the profile `name`, or the
    /// brand name when the provider did not send one.
    fn to_str(&self) -> String {
        self.account()
            .extra_str("name")
            .map_or_else(|| self.brand_name().to_string(), str::to_string)
    }
}
