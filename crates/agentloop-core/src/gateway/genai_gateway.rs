//! GenaiGateway - completion gateway using the genai crate
//!
//! Handles the genai-native providers (OpenAI, Anthropic, Gemini, etc.) and
//! OpenAI-compatible endpoints such as GitHub Models through the
//! ServiceTargetResolver.

use async_trait::async_trait;
use std::sync::Arc;

use genai::chat::{ChatOptions as GenaiOptions, ChatRequest};
use genai::Client;

use crate::config::AgentConfig;
use crate::logging::Logger;
use crate::types::{ChatMessage, Tool};
use crate::{log_debug, log_info, log_warn};

use super::error::{GatewayError, GatewayResult};
use super::genai_adapter::{
    create_client, from_genai_tool_call, to_genai_messages, to_genai_options, to_genai_tools,
    ProviderConfig,
};
use super::traits::{ModelGateway, ModelResponse};

/// Gateway backed by a genai client
pub struct GenaiGateway {
    provider_id: String,
    model: String,
    client: Client,
    options: GenaiOptions,
    logger: Arc<dyn Logger>,
}

impl GenaiGateway {
    /// Create a gateway for a resolved configuration
    ///
    /// Fails with `MissingApiKey` when no key was resolved, except for
    /// providers that run without one (ollama).
    pub fn new(config: &AgentConfig, logger: Arc<dyn Logger>) -> GatewayResult<Self> {
        let provider = ProviderConfig::from(config);
        if provider.api_key.is_none() && config.requires_api_key() {
            return Err(GatewayError::missing_api_key(&provider.provider));
        }

        log_debug!(
            logger,
            "[GenaiGateway] provider={} model={} endpoint={}",
            provider.provider,
            config.model,
            provider.api_base.as_deref().unwrap_or("(default)")
        );

        Ok(Self {
            provider_id: provider.provider.clone(),
            model: config.model.clone(),
            client: create_client(&provider),
            options: to_genai_options(config),
            logger,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelGateway for GenaiGateway {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn complete(
        &self,
        transcript: &[ChatMessage],
        tools: &[Tool],
    ) -> GatewayResult<ModelResponse> {
        log_info!(
            self.logger,
            "[GenaiGateway] complete: model={}, messages={}, tools={}",
            self.model,
            transcript.len(),
            tools.len()
        );

        let mut chat_req = ChatRequest::new(to_genai_messages(transcript)?);
        if !tools.is_empty() {
            chat_req = chat_req.with_tools(to_genai_tools(tools));
        }

        let chat_res = self
            .client
            .exec_chat(self.model.as_str(), chat_req, Some(&self.options))
            .await
            .map_err(|e| {
                log_warn!(self.logger, "[GenaiGateway] request failed: {}", e);
                GatewayError::api(&self.provider_id, e.to_string())
            })?;

        let tool_calls = chat_res.tool_calls();
        if !tool_calls.is_empty() {
            log_debug!(self.logger, "[GenaiGateway] {} tool call(s) requested", tool_calls.len());
            return Ok(ModelResponse::ToolCallsRequested(
                tool_calls
                    .into_iter()
                    .enumerate()
                    .map(|(i, tc)| from_genai_tool_call(tc, i))
                    .collect(),
            ));
        }

        chat_res
            .first_text()
            .map(|text| ModelResponse::FinalAnswer(text.to_string()))
            .ok_or_else(|| {
                GatewayError::invalid_response(&self.provider_id, "response has neither text nor tool calls")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    fn config(provider: &str, key: Option<&str>) -> AgentConfig {
        AgentConfig {
            provider: provider.to_string(),
            api_key: key.map(String::from),
            ..AgentConfig::default()
        }
    }

    #[test]
    fn test_requires_key() {
        let err = GenaiGateway::new(&config("github", None), NoOpLogger::shared()).err();
        assert!(matches!(err, Some(GatewayError::MissingApiKey { provider }) if provider == "github"));
    }

    #[test]
    fn test_ollama_runs_without_key() {
        let gateway = GenaiGateway::new(&config("ollama", None), NoOpLogger::shared()).unwrap();
        assert_eq!(gateway.name(), "ollama");
    }

    #[test]
    fn test_new() {
        let gateway = GenaiGateway::new(&config("GitHub", Some("ghp")), NoOpLogger::shared()).unwrap();
        assert_eq!(gateway.name(), "github");
        assert_eq!(gateway.model(), "openai/gpt-4o");
    }
}
