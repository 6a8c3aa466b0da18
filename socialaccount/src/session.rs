//! Session store trait.

use std::collections::HashMap;

/// Per-user session storage supplied by the host framework.
///
/// Only string values are needed by the adapters. The store is scoped to
/// one user session, so nothing here is shared across requests.
pub trait SessionStore: Send {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one.
    fn insert(&mut self, key: &str, value: String);

    /// Remove a value, returning it if it was present.
    fn remove(&mut self, key: &str) -> Option<String>;
}

/// `HashMap`-backed session.
///
/// Suitable for tests and for hosts that load the session into memory
/// for the duration of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySession {
    values: HashMap<String, String>,
}

impl InMemorySession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the session holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for InMemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}
