//! Core types shared by the registry, gateway and orchestrator

mod message;
mod tool;
mod cancellation;

pub use message::{ChatMessage, MessageRole};
pub use tool::{Tool, ToolCall, ToolResult};
pub use cancellation::CancellationToken;
