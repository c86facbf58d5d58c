//! Tool error types

use thiserror::Error;

/// Errors raised while registering or invoking tools
///
/// Only `DuplicateTool` and `InvalidDescriptor` escape to the caller; the
/// other variants are turned into `tool_result` text by the agent loop so the
/// model can react to them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// A tool with this name is already registered
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The descriptor being built is incomplete or inconsistent
    #[error("invalid tool descriptor: {0}")]
    InvalidDescriptor(String),

    /// The model asked for a tool that does not exist
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),

    /// Arguments do not match the declared parameters
    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    /// The handler itself failed
    #[error("failed to execute tool '{tool}': {message}")]
    Execution { tool: String, message: String },
}

impl ToolError {
    /// Create an invalid arguments error
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by a tool handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ToolFailure(String);

impl ToolFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for ToolFailure {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ToolFailure {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
