//! Mock gateway for testing
//!
//! Deterministic, configurable responses without network dependencies. Every
//! request is recorded so tests can inspect what the model was shown.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::error::{GatewayError, GatewayResult};
use super::traits::{ModelGateway, ModelResponse};
use crate::log_debug;
use crate::logging::Logger;
use crate::types::{ChatMessage, MessageRole, Tool};

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Answer with the last user message
    #[default]
    Echo,
    /// Always answer with the same text
    Fixed(String),
    /// Play responses in order, then fall back (or fail when there is none)
    Script {
        responses: Vec<ModelResponse>,
        fallback: Option<ModelResponse>,
    },
    /// Always return the same response
    Repeat(ModelResponse),
    /// Fail every request
    Error(String),
}

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub transcript: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

/// Mock model gateway for testing and offline demos
pub struct MockGateway {
    mode: MockMode,
    script: Mutex<VecDeque<ModelResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
    logger: Arc<dyn Logger>,
}

impl MockGateway {
    /// Create a mock with a specific mode
    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        let script = match &mode {
            MockMode::Script { responses, .. } => responses.iter().cloned().collect(),
            _ => VecDeque::new(),
        };

        Self {
            mode,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            delay: None,
            logger,
        }
    }

    /// Echo back the last user message
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Always answer with `response`
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Play `responses` in order; fail once they run out
    pub fn scripted(responses: Vec<ModelResponse>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(
            MockMode::Script {
                responses,
                fallback: None,
            },
            logger,
        )
    }

    /// Play `responses` in order, then keep returning `fallback`
    pub fn scripted_with_fallback(
        responses: Vec<ModelResponse>,
        fallback: ModelResponse,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self::with_mode(
            MockMode::Script {
                responses,
                fallback: Some(fallback),
            },
            logger,
        )
    }

    /// Always return `response`
    pub fn repeat(response: ModelResponse, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Repeat(response), logger)
    }

    /// Fail every request with `message`
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Wait before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Transcript of the most recent request
    pub fn last_transcript(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().last().map(|r| r.transcript.clone())
    }

    fn last_user_message(transcript: &[ChatMessage]) -> &str {
        transcript
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User && !m.content.is_empty())
            .map(|m| m.content.as_str())
            .unwrap_or("Hello from MockGateway!")
    }

    fn respond(&self, transcript: &[ChatMessage]) -> GatewayResult<ModelResponse> {
        match &self.mode {
            MockMode::Echo => Ok(ModelResponse::FinalAnswer(format!(
                "Echo: {}",
                Self::last_user_message(transcript)
            ))),
            MockMode::Fixed(text) => Ok(ModelResponse::FinalAnswer(text.clone())),
            MockMode::Script { fallback, .. } => match self.script.lock().pop_front() {
                Some(response) => Ok(response),
                None => fallback
                    .clone()
                    .ok_or_else(|| GatewayError::invalid_response("mock", "script exhausted")),
            },
            MockMode::Repeat(response) => Ok(response.clone()),
            MockMode::Error(message) => Err(GatewayError::api("mock", message.clone())),
        }
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        transcript: &[ChatMessage],
        tools: &[Tool],
    ) -> GatewayResult<ModelResponse> {
        log_debug!(
            self.logger,
            "MockGateway: complete called with {} message(s)",
            transcript.len()
        );

        self.requests.lock().push(RecordedRequest {
            transcript: transcript.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.respond(transcript)
    }
}
