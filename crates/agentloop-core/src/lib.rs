//! agentloop core
//!
//! A minimal tool-calling agent runtime: a registry of callable tools, a
//! transcript, a gateway to the completion provider and the loop that ties
//! them together.
//!
//! ## Running a turn
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agentloop_core::{Agent, ToolRegistry, create_gateway, ConfigLoader, ConsoleLogger};
//! use agentloop_core::tools::builtin::{register_builtin_tools, SystemClock};
//!
//! let logger = Arc::new(ConsoleLogger::from_env());
//! let config = ConfigLoader::new().load()?;
//!
//! let mut registry = ToolRegistry::new(logger.clone());
//! register_builtin_tools(&mut registry, Arc::new(SystemClock))?;
//!
//! let gateway = create_gateway(&config, logger.clone())?;
//! let mut agent = Agent::new(gateway, Arc::new(registry), logger)
//!     .with_options((&config).into());
//!
//! let outcome = agent.run_turn("What is 25 * 4 + 10?").await;
//! ```

pub mod agent;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod logging;
pub mod secrets;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{CancellationToken, ChatMessage, MessageRole, Tool, ToolCall, ToolResult};

pub use agent::{Agent, AgentOptions, TurnError, TurnOutcome, TurnResult};

pub use conversation::{Conversation, ConversationError};

pub use gateway::{
    create_gateway, GatewayError, GatewayResult, GenaiGateway, MockGateway, MockMode,
    ModelGateway, ModelResponse,
};

pub use tools::{
    ParameterType, ToolArguments, ToolDescriptor, ToolError, ToolFailure, ToolHandler,
    ToolRegistry,
};

pub use config::{AgentConfig, ConfigError, ConfigLoader, ConfigOverrides, FileConfigProvider};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use logging::{ConsoleLogger, LogLevel, Logger, NoOpLogger, SharedLogger};
