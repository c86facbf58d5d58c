//! File-based configuration (YAML)
//!
//! User-level config lives at `~/.config/agentloop/config.yaml`; `--config`
//! points at any other file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Configuration file structure
///
/// Every field is optional; absent fields keep the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_rounds: Option<usize>,
    pub system_prompt: Option<String>,
    pub parallel_tool_calls: Option<bool>,
}

/// Where a config file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// `~/.config/agentloop/config.yaml`
    User,
    /// A path given on the command line
    Explicit,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Explicit => "explicit",
        }
    }
}

/// Reads a YAML config file
///
/// ```no_run
/// use agentloop_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let file = user_config.load().unwrap_or_default();
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    /// User-level config provider (~/.config/agentloop/config.yaml)
    pub fn user() -> Self {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("agentloop").join("config.yaml"), ConfigLevel::User)
    }

    /// Config provider for a path given explicitly
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ConfigLevel::Explicit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file
    ///
    /// A missing user-level file is an empty config; a missing explicit file
    /// is an error.
    pub fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.exists() && self.level == ConfigLevel::User {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}
