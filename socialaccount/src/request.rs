//! Per-request context handed to the adapters.

use crate::apps::SiteId;
use crate::session::SessionStore;
use std::collections::BTreeMap;
use std::fmt;

/// The slice of an incoming HTTP request the adapters need.
///
/// The host framework builds one per request and owns the session behind
/// it. Adapters only read from it, except for the session nonce.
pub struct LoginRequest {
    /// Scheme and host, e.g. `https://app.example.com`.
    origin: String,

    /// Primary language tag negotiated for the request (e.g. `en-gb`).
    language: Option<String>,

    /// Site the request was made against.
    site_id: SiteId,

    /// Query string parameters.
    query: BTreeMap<String, String>,

    /// The user's session.
    session: Box<dyn SessionStore>,
}

impl LoginRequest {
    /// Create a request context.
    ///
    /// A trailing `/` on `origin` is dropped.
    #[must_use]
    pub fn new(origin: impl Into<String>, session: impl SessionStore + 'static) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        Self {
            origin,
            language: None,
            site_id: SiteId::default(),
            query: BTreeMap::new(),
            session: Box::new(session),
        }
    }

    /// Set the negotiated language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the site.
    #[must_use]
    pub const fn with_site(mut self, site_id: SiteId) -> Self {
        self.site_id = site_id;
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Negotiated language, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Site the request targets.
    #[must_use]
    pub const fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Look up a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Shared access to the session.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Mutable access to the session.
    pub fn session_mut(&mut self) -> &mut dyn SessionStore {
        self.session.as_mut()
    }

    /// Turn an absolute path into a full URL on this request's origin.
    #[must_use]
    pub fn build_absolute_uri(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.origin)
        } else {
            format!("{}/{path}", self.origin)
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("origin", &self.origin)
            .field("language", &self.language)
            .field("site_id", &self.site_id)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
