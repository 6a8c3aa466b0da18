//! Provider app credentials.

use serde::{Deserialize, Serialize};

/// Identifier of a site served by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub u64);

impl Default for SiteId {
    fn default() -> Self {
        Self(1)
    }
}

/// Credentials registered with an external provider.
///
/// One app may serve several sites; each (provider, site) pair resolves
/// to at most one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialApp {
    /// Provider id this app belongs to.
    pub provider: String,

    /// Human-readable label.
    pub name: String,

    /// OAuth2 client id (Facebook "App ID").
    pub client_id: String,

    /// OAuth2 client secret. Never serialized.
    #[serde(skip_serializing, default)]
    pub secret: String,

    /// Extra key some providers require.
    #[serde(default)]
    pub key: String,

    /// Sites this app is enabled for.
    #[serde(default)]
    pub sites: Vec<SiteId>,
}

impl SocialApp {
    /// Create an app enabled for the default site.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        name: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
            client_id: client_id.into(),
            secret: secret.into(),
            key: String::new(),
            sites: vec![SiteId::default()],
        }
    }

    /// Replace the list of enabled sites.
    #[must_use]
    pub fn with_sites(mut self, sites: Vec<SiteId>) -> Self {
        self.sites = sites;
        self
    }

    /// Whether this app is enabled for `site`.
    #[must_use]
    pub fn serves(&self, site: SiteId) -> bool {
        self.sites.contains(&site)
    }
}

/// Lookup of provider apps, backed by the host's database.
pub trait SocialAppStore: Send + Sync {
    /// Find the app for `provider` on `site`.
    fn find(&self, provider: &str, site: SiteId) -> Option<SocialApp>;
}

/// In-memory app store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySocialAppStore {
    apps: Vec<SocialApp>,
}

impl InMemorySocialAppStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an app.
    #[must_use]
    pub fn with_app(mut self, app: SocialApp) -> Self {
        self.apps.push(app);
        self
    }
}

impl SocialAppStore for InMemorySocialAppStore {
    fn find(&self, provider: &str, site: SiteId) -> Option<SocialApp> {
        self.apps
            .iter()
            .find(|app| app.provider == provider && app.serves(site))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_provider_and_site() {
        let store = InMemorySocialAppStore::new()
            .with_app(SocialApp::new("facebook", "FB", "fb-id", "fb-secret"))
            .with_app(
                SocialApp::new("douban", "Douban", "db-id", "db-secret")
                    .with_sites(vec![SiteId(2)]),
            );

        assert_eq!(
            store.find("facebook", SiteId(1)).map(|a| a.client_id),
            Some("fb-id".to_string())
        );
        assert!(store.find("douban", SiteId(1)).is_none());
        assert!(store.find("douban", SiteId(2)).is_some());
        assert!(store.find("github", SiteId(1)).is_none());
    }

    #[test]
    fn test_secret_not_serialized() {
        let app = SocialApp::new("facebook", "FB", "fb-id", "top-secret");
        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains("fb-id"));
        assert!(!json.contains("top-secret"));
    }
}
