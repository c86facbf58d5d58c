//! Secret store trait

use super::env_store::lookup_keys;

/// Read access to credentials and process settings
///
/// The configuration layer reads everything environment-shaped through this
/// trait, so tests can swap the process environment for a
/// [`MemorySecretStore`](super::MemorySecretStore).
///
/// # Example
///
/// ```
/// use agentloop_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// // store.get("openai") checks OPENAI_API_KEY
/// let _ = store.get("openai");
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve the value stored under exactly `name`
    ///
    /// Empty values count as absent.
    fn get_exact(&self, name: &str) -> Option<String>;

    /// Retrieve a value by key
    ///
    /// The key can be:
    /// - A provider name (e.g., "github") mapped to its conventional variables
    /// - A direct key (e.g., "GITHUB_TOKEN")
    fn get(&self, key: &str) -> Option<String> {
        lookup_keys(key).iter().find_map(|name| self.get_exact(name))
    }

    /// Check if a value exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
