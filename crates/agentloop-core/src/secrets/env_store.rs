//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("github", vec!["GITHUB_TOKEN", "GITHUB_MODELS_TOKEN"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("mistral", vec!["MISTRAL_API_KEY"]);
    m.insert("azure", vec!["AZURE_API_KEY", "AZURE_OPENAI_API_KEY"]);
    m.insert("openrouter", vec!["OPENROUTER_API_KEY"]);
    m.insert("ollama", vec![]); // Ollama doesn't need an API key
    m
});

/// Names to try, in order, when looking up `key`
///
/// The key itself, then the provider's mapped variables, then
/// `<KEY>_API_KEY`.
pub(crate) fn lookup_keys(key: &str) -> Vec<String> {
    let mut keys = vec![key.to_string()];
    if let Some(vars) = ENV_VAR_MAP.get(key.to_lowercase().as_str()) {
        keys.extend(vars.iter().map(|v| v.to_string()));
    }
    keys.push(format!("{}_API_KEY", key.to_uppercase()));
    keys
}

/// Secret store that reads from environment variables
///
/// Read-only. Values come from the shell or from a `.env` file loaded by the
/// binary at startup.
///
/// # Provider Mapping
///
/// - `openai` → `OPENAI_API_KEY`
/// - `github` → `GITHUB_TOKEN`
/// - `gemini` → `GEMINI_API_KEY` or `GOOGLE_API_KEY`
/// - anything else → `<NAME>_API_KEY`
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a provider
    pub fn env_vars_for_provider(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).map(|v| v.as_slice())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get_exact(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.is_empty())
    }
}
