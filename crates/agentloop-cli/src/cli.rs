use std::path::PathBuf;

use clap::Parser;

use agentloop_core::config::{ConfigLoader, ConfigOverrides, FileConfigProvider};
use agentloop_core::logging::{LogLevel, LOG_LEVEL_ENV};

/// Queries run when none are given on the command line
pub const DEMO_QUERIES: [&str; 3] = [
    "What time is it right now?",
    "What is 25 * 4 + 10?",
    "Reverse the string 'Hello World'",
];

#[derive(Parser, Debug)]
#[command(
    name = "agentloop",
    version,
    about = "Run queries through a tool-calling agent loop"
)]
pub struct Cli {
    /// Config file (defaults to ~/.config/agentloop/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Provider id, e.g. github, openai, ollama or mock
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    /// OpenAI-compatible endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Tool-call rounds allowed per query
    #[arg(long)]
    pub max_rounds: Option<usize>,
    /// Print the available tools and exit
    #[arg(long)]
    pub list_tools: bool,
    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
    /// Queries to run in one conversation
    #[arg()]
    pub queries: Vec<String>,
}

impl Cli {
    pub fn loader(&self) -> ConfigLoader {
        let file = match &self.config {
            Some(path) => FileConfigProvider::explicit(path),
            None => FileConfigProvider::user(),
        };
        ConfigLoader::new()
            .with_file(file)
            .with_overrides(ConfigOverrides {
                provider: self.provider.clone(),
                model: self.model.clone(),
                api_base: self.endpoint.clone(),
                max_rounds: self.max_rounds,
            })
    }

    /// `--verbose`, else `AGENTLOOP_LOG_LEVEL`, else warnings only
    pub fn log_level(&self) -> LogLevel {
        if self.verbose {
            return LogLevel::Debug;
        }
        std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| LogLevel::parse(&v))
            .unwrap_or(LogLevel::Warn)
    }

    pub fn queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
        } else {
            self.queries.clone()
        }
    }
}
