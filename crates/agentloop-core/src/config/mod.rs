//! Configuration
//!
//! - `FileConfigProvider`: YAML file (user level or explicit path)
//! - `AgentConfig`: the resolved settings
//! - `ConfigLoader`: defaults, file, environment and overrides, in that order

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigFile, ConfigLevel, FileConfigProvider};
pub use settings::{
    AgentConfig, ConfigLoader, ConfigOverrides, DEFAULT_API_BASE, DEFAULT_MAX_ROUNDS,
    DEFAULT_MODEL, DEFAULT_PROVIDER, DEFAULT_SYSTEM_PROMPT, ENV_API_ENDPOINT, ENV_API_KEY,
    ENV_API_MODEL, ENV_API_PROVIDER, ENV_MAX_ROUNDS, MOCK_PROVIDER,
};
