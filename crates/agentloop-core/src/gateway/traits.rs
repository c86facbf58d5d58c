//! Model gateway trait

use async_trait::async_trait;

use super::error::GatewayResult;
use crate::types::{ChatMessage, Tool, ToolCall};

/// What the model decided to do with a transcript
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// A final assistant answer
    FinalAnswer(String),
    /// One or more tool invocations, in the order the model issued them
    ToolCallsRequested(Vec<ToolCall>),
}

impl ModelResponse {
    pub fn answer(text: impl Into<String>) -> Self {
        Self::FinalAnswer(text.into())
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::ToolCallsRequested(calls)
    }
}

/// Boundary to the remote completion provider
///
/// Implementations translate the transcript and tool schemas into the
/// provider's wire format and the reply back into a [`ModelResponse`].
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Provider name (e.g., "github", "openai", "mock")
    fn name(&self) -> &str;

    /// Ask the model for the next step
    async fn complete(
        &self,
        transcript: &[ChatMessage],
        tools: &[Tool],
    ) -> GatewayResult<ModelResponse>;
}
