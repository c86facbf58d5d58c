//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// Secret store backed by a map, standing in for the process environment
///
/// Lookups follow the same provider mapping as
/// [`EnvSecretStore`](super::EnvSecretStore), so `get("github")` finds a
/// value stored under `GITHUB_TOKEN`.
///
/// ```
/// use agentloop_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new().with("GITHUB_TOKEN", "ghp-test");
/// assert_eq!(store.get("github"), Some("ghp-test".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder style)
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl FromIterator<(String, String)> for MemorySecretStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_exact(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        store.insert("API_KEY", "one");
        assert_eq!(store.get("API_KEY"), Some("one".to_string()));

        store.insert("API_KEY", "two");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("API_KEY"), Some("two".to_string()));

        assert_eq!(store.remove("API_KEY"), Some("two".to_string()));
        assert!(!store.has("API_KEY"));
    }

    #[test]
    fn test_provider_mapping() {
        let store = MemorySecretStore::new()
            .with("OPENAI_API_KEY", "sk-test")
            .with("GITHUB_TOKEN", "");

        assert_eq!(store.name(), "memory");
        assert_eq!(store.get("openai"), Some("sk-test".to_string()));
        assert_eq!(store.get("github"), None);
        assert_eq!(store.get_exact("openai"), None);
        assert_eq!(store.get_exact("OPENAI_API_KEY"), Some("sk-test".to_string()));
    }

    #[test]
    fn test_from_iter() {
        let store: MemorySecretStore = [("A".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(store.get("A"), Some("1".to_string()));
    }
}
