//! Resolved agent configuration
//!
//! Sources in increasing priority: built-in defaults, the YAML file, the
//! environment (read through a [`SecretStore`]), then command-line overrides.

use std::sync::Arc;

use super::error::{ConfigError, ConfigResult};
use super::file::{ConfigFile, FileConfigProvider};
use crate::secrets::{EnvSecretStore, SecretStore};

pub const DEFAULT_PROVIDER: &str = "github";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_API_BASE: &str = "https://models.github.ai/inference/";
pub const DEFAULT_MAX_ROUNDS: usize = 5;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a professional and helpful AI assistant. Provide succinct, accurate responses.";

/// Environment keys
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_API_ENDPOINT: &str = "API_ENDPOINT";
pub const ENV_API_MODEL: &str = "API_MODEL";
pub const ENV_API_PROVIDER: &str = "API_PROVIDER";
pub const ENV_MAX_ROUNDS: &str = "AGENTLOOP_MAX_ROUNDS";

/// Provider that runs without network or credentials
pub const MOCK_PROVIDER: &str = "mock";

/// Providers that accept requests without an API key
const KEYLESS_PROVIDERS: &[&str] = &[MOCK_PROVIDER, "ollama"];

/// Everything needed to build a gateway and an agent
#[derive(Clone, PartialEq)]
pub struct AgentConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub max_rounds: usize,
    pub system_prompt: Option<String>,
    pub parallel_tool_calls: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: Some(DEFAULT_API_BASE.to_string()),
            temperature: 0.0,
            max_tokens: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            parallel_tool_calls: true,
        }
    }
}

impl AgentConfig {
    /// Offline configuration using the mock gateway
    pub fn mock() -> Self {
        Self {
            provider: MOCK_PROVIDER.to_string(),
            model: "mock-echo".to_string(),
            api_base: None,
            ..Self::default()
        }
    }

    pub fn is_mock(&self) -> bool {
        self.provider.eq_ignore_ascii_case(MOCK_PROVIDER)
    }

    /// Whether the provider refuses requests without an API key
    pub fn requires_api_key(&self) -> bool {
        !KEYLESS_PROVIDERS
            .iter()
            .any(|p| self.provider.eq_ignore_ascii_case(p))
    }

    /// Overlay values present in a config file
    pub fn merge_file(&mut self, file: ConfigFile) {
        if let Some(provider) = file.provider {
            self.switch_provider(provider);
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if file.api_base.is_some() {
            self.api_base = file.api_base;
        }
        if let Some(temperature) = file.temperature {
            self.temperature = temperature;
        }
        if file.max_tokens.is_some() {
            self.max_tokens = file.max_tokens;
        }
        if let Some(max_rounds) = file.max_rounds {
            self.max_rounds = max_rounds;
        }
        if file.system_prompt.is_some() {
            self.system_prompt = file.system_prompt;
        }
        if let Some(parallel) = file.parallel_tool_calls {
            self.parallel_tool_calls = parallel;
        }
    }

    /// Overlay the `API_*` and `AGENTLOOP_*` environment keys
    ///
    /// These are plain variable names, so they skip the provider mapping.
    pub fn merge_env(&mut self, env: &dyn SecretStore) -> ConfigResult<()> {
        if let Some(provider) = env.get_exact(ENV_API_PROVIDER) {
            self.switch_provider(provider);
        }
        if let Some(model) = env.get_exact(ENV_API_MODEL) {
            self.model = model;
        }
        if let Some(endpoint) = env.get_exact(ENV_API_ENDPOINT) {
            self.api_base = Some(endpoint);
        }
        if let Some(key) = env.get_exact(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(raw) = env.get_exact(ENV_MAX_ROUNDS) {
            self.max_rounds = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_MAX_ROUNDS, format!("'{}' is not a count", raw)))?;
        }
        Ok(())
    }

    /// Overlay command-line overrides
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(provider) = overrides.provider {
            self.switch_provider(provider);
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if overrides.api_base.is_some() {
            self.api_base = overrides.api_base;
        }
        if let Some(max_rounds) = overrides.max_rounds {
            self.max_rounds = max_rounds;
        }
    }

    /// Fill the API key from the provider's conventional variable and check
    /// the result is usable
    pub fn finalize(mut self, env: &dyn SecretStore) -> ConfigResult<Self> {
        if self.api_key.is_none() && !self.is_mock() {
            self.api_key = env.get(&self.provider);
        }

        if self.api_key.is_none() && self.requires_api_key() {
            let hint = EnvSecretStore::env_vars_for_provider(&self.provider)
                .filter(|vars| !vars.is_empty())
                .map(|vars| vars.join(" or "))
                .unwrap_or_else(|| format!("{}_API_KEY", self.provider.to_uppercase()));
            return Err(ConfigError::MissingApiKey {
                provider: self.provider.clone(),
                hint,
            });
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::invalid_value("max_rounds", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid_value(
                "temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        Ok(self)
    }

    /// A provider other than the default GitHub Models one does not inherit
    /// its endpoint
    fn switch_provider(&mut self, provider: String) {
        if provider != self.provider && self.api_base.as_deref() == Some(DEFAULT_API_BASE) {
            self.api_base = None;
        }
        self.provider = provider;
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_rounds", &self.max_rounds)
            .field("system_prompt", &self.system_prompt)
            .field("parallel_tool_calls", &self.parallel_tool_calls)
            .finish()
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub max_rounds: Option<usize>,
}

/// Resolves an [`AgentConfig`] from all sources
pub struct ConfigLoader {
    file: FileConfigProvider,
    env: Arc<dyn SecretStore>,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Loader reading the user config file and the process environment
    pub fn new() -> Self {
        Self {
            file: FileConfigProvider::user(),
            env: Arc::new(EnvSecretStore::new()),
            overrides: ConfigOverrides::default(),
        }
    }

    pub fn with_file(mut self, file: FileConfigProvider) -> Self {
        self.file = file;
        self
    }

    pub fn with_env(mut self, env: Arc<dyn SecretStore>) -> Self {
        self.env = env;
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load(self) -> ConfigResult<AgentConfig> {
        let mut config = AgentConfig::default();
        config.merge_file(self.file.load()?);
        config.merge_env(self.env.as_ref())?;
        config.apply(self.overrides);
        config.finalize(self.env.as_ref())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &tempfile::TempDir, yaml: &str, env: MemorySecretStore) -> ConfigLoader {
        let path = dir.path().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        ConfigLoader::new()
            .with_file(FileConfigProvider::explicit(path))
            .with_env(Arc::new(env))
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let config = loader(&dir, "", MemorySecretStore::new().with("GITHUB_TOKEN", "ghp"))
            .load()
            .unwrap();

        assert_eq!(config.provider, "github");
        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.api_base.as_deref(), Some(DEFAULT_API_BASE));
        assert_eq!(config.api_key.as_deref(), Some("ghp"));
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.temperature, 0.0);
        assert!(config.parallel_tool_calls);
        assert_eq!(config.system_prompt.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
    }

    #[test]
    fn test_precedence() {
        let dir = tempdir().unwrap();
        let env = MemorySecretStore::new()
            .with(ENV_API_KEY, "from-env")
            .with(ENV_API_MODEL, "env-model")
            .with(ENV_MAX_ROUNDS, "7");
        let config = loader(&dir, "model: file-model\nmax_rounds: 2\napi_key: from-file\n", env)
            .with_overrides(ConfigOverrides {
                max_rounds: Some(9),
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.model, "env-model");
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.max_rounds, 9);
    }

    #[test]
    fn test_file_beats_defaults() {
        let dir = tempdir().unwrap();
        let yaml = "provider: openai\nmodel: gpt-4o-mini\nparallel_tool_calls: false\n";
        let config = loader(&dir, yaml, MemorySecretStore::new().with("OPENAI_API_KEY", "sk"))
            .load()
            .unwrap();

        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_base, None);
        assert_eq!(config.api_key.as_deref(), Some("sk"));
        assert!(!config.parallel_tool_calls);
    }

    #[test]
    fn test_missing_api_key() {
        let dir = tempdir().unwrap();
        let err = loader(&dir, "", MemorySecretStore::new()).load().unwrap_err();
        match err {
            ConfigError::MissingApiKey { provider, hint } => {
                assert_eq!(provider, "github");
                assert!(hint.contains("GITHUB_TOKEN"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mock_needs_no_key() {
        let dir = tempdir().unwrap();
        let env = MemorySecretStore::new().with(ENV_API_PROVIDER, "mock");
        let config = loader(&dir, "", env).load().unwrap();
        assert!(config.is_mock());
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let dir = tempdir().unwrap();
        let env = MemorySecretStore::new().with(ENV_API_PROVIDER, "ollama");
        let config = loader(&dir, "model: llama3.1\n", env).load().unwrap();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base, None);
        assert!(!config.requires_api_key());
        assert!(AgentConfig::default().requires_api_key());
    }

    #[test]
    fn test_env_settings_skip_provider_mapping() {
        let dir = tempdir().unwrap();
        let env = MemorySecretStore::new()
            .with("API_MODEL_API_KEY", "not-a-model")
            .with("API_KEY_API_KEY", "not-a-key")
            .with("GITHUB_TOKEN", "ghp");
        let config = loader(&dir, "", env).load().unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key.as_deref(), Some("ghp"));
    }

    #[test]
    fn test_invalid_values() {
        let dir = tempdir().unwrap();
        let env = MemorySecretStore::new()
            .with(ENV_API_PROVIDER, "mock")
            .with(ENV_MAX_ROUNDS, "lots");
        assert!(matches!(
            loader(&dir, "", env).load(),
            Err(ConfigError::InvalidValue { key, .. }) if key == ENV_MAX_ROUNDS
        ));

        let zero = loader(&dir, "max_rounds: 0\n", MemorySecretStore::new().with(ENV_API_PROVIDER, "mock"));
        assert!(matches!(zero.load(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AgentConfig {
            api_key: Some("sk-secret".into()),
            ..AgentConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}
