//! Adapter between agentloop types and genai types
//!
//! Conversion functions between the transcript/tool types and genai's, plus
//! client construction. All auth flows through the resolved configuration,
//! never through genai's default env var lookup.

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, Tool as GenaiTool,
    ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::json;

use super::error::GatewayResult;
use crate::config::AgentConfig;
use crate::types::{ChatMessage, MessageRole, Tool, ToolCall};

// ============================================================================
// Message Conversion: agentloop -> genai
// ============================================================================

/// Convert a tool call back into genai's representation
pub fn to_genai_tool_call(call: &ToolCall) -> GatewayResult<GenaiToolCall> {
    // Built through serde so provider-specific extra fields keep their defaults
    let value = json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": call.arguments,
    });
    Ok(serde_json::from_value(value)?)
}

/// Convert one transcript message
pub fn to_genai_message(msg: &ChatMessage) -> GatewayResult<GenaiMessage> {
    let converted = match msg.role {
        MessageRole::System => GenaiMessage::system(msg.content.clone()),
        MessageRole::User => GenaiMessage::user(msg.content.clone()),
        MessageRole::Assistant if msg.has_tool_calls() => {
            let calls = msg
                .tool_calls
                .iter()
                .map(to_genai_tool_call)
                .collect::<GatewayResult<Vec<_>>>()?;
            GenaiMessage::from(calls)
        }
        MessageRole::Assistant => GenaiMessage::assistant(msg.content.clone()),
        MessageRole::ToolResult => {
            let call_id = msg.tool_call_id.clone().unwrap_or_default();
            GenaiMessage::from(GenaiToolResponse::new(call_id, msg.content.clone()))
        }
    };
    Ok(converted)
}

/// Convert a transcript, preserving order
pub fn to_genai_messages(messages: &[ChatMessage]) -> GatewayResult<Vec<GenaiMessage>> {
    messages.iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool Conversion: agentloop -> genai
// ============================================================================

/// Convert a tool schema into a genai tool definition
pub fn to_genai_tool(tool: &Tool) -> GenaiTool {
    let genai_tool = GenaiTool::new(tool.name.clone()).with_description(tool.description.clone());
    match &tool.input_schema {
        Some(schema) => genai_tool.with_schema(schema.clone()),
        None => genai_tool,
    }
}

/// Convert tool schemas, preserving registration order
pub fn to_genai_tools(tools: &[Tool]) -> Vec<GenaiTool> {
    tools.iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion
// ============================================================================

/// Request options from the resolved configuration
pub fn to_genai_options(config: &AgentConfig) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default().with_temperature(config.temperature);

    if let Some(max_tokens) = config.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> agentloop
// ============================================================================

/// Convert a genai tool call
///
/// Some OpenAI-compatible endpoints omit call ids; a positional id keeps the
/// results linkable.
pub fn from_genai_tool_call(tc: &GenaiToolCall, index: usize) -> ToolCall {
    let id = if tc.call_id.trim().is_empty() {
        format!("call_{}", index)
    } else {
        tc.call_id.clone()
    };

    ToolCall::new(id, tc.fn_name.clone(), tc.fn_arguments.clone())
}

// ============================================================================
// Provider Resolution
// ============================================================================

/// Provider configuration for routing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "github", "openai", "openrouter")
    pub provider: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl From<&AgentConfig> for ProviderConfig {
    fn from(config: &AgentConfig) -> Self {
        Self {
            provider: config.provider.to_lowercase(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        }
    }
}

/// Endpoint URL with the trailing slash genai expects when joining paths
pub fn normalize_endpoint(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Built-in endpoint for OpenAI-compatible providers genai has no adapter for
pub fn default_endpoint(provider: &str) -> Option<&'static str> {
    match provider {
        "github" => Some("https://models.github.ai/inference/"),
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        _ => None,
    }
}

/// Check if a provider is natively supported by genai
pub fn is_genai_native(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai"
            | "anthropic"
            | "gemini"
            | "ollama"
            | "groq"
            | "xai"
            | "deepseek"
            | "cohere"
            | "fireworks"
            | "together"
    )
}

/// Create a genai Client with custom auth and endpoint resolution
///
/// A custom `api_base`, or a provider genai does not know, routes through
/// the OpenAI-compatible adapter at that endpoint.
pub fn create_client(config: &ProviderConfig) -> Client {
    let auth_key = config.api_key.clone();
    let auth_resolver = AuthResolver::from_resolver_fn(
        move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
            Ok(auth_key.clone().map(AuthData::from_single))
        },
    );

    let endpoint = config
        .api_base
        .as_deref()
        .or_else(|| default_endpoint(&config.provider))
        .map(normalize_endpoint);
    let native = is_genai_native(&config.provider);

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let ServiceTarget { ref model, .. } = target;

            let resolved_endpoint = match &endpoint {
                Some(url) => Endpoint::from_owned(url.clone()),
                // Native genai provider on its default endpoint
                None if native => return Ok(target),
                None => Endpoint::from_static("https://api.openai.com/v1/"),
            };

            let resolved_model = if native {
                model.clone()
            } else {
                ModelIden::new(AdapterKind::OpenAI, model.model_name.clone())
            };

            Ok(ServiceTarget {
                endpoint: resolved_endpoint,
                auth: target.auth, // Auth is handled by AuthResolver
                model: resolved_model,
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ParameterType, ToolDescriptor};
    use genai::chat::ChatRole as GenaiRole;

    #[test]
    fn test_message_conversion() {
        let user = to_genai_message(&ChatMessage::user("Hello, world!")).unwrap();
        assert!(matches!(user.role, GenaiRole::User));

        let system = to_genai_message(&ChatMessage::system("Be brief")).unwrap();
        assert!(matches!(system.role, GenaiRole::System));

        let calls = vec![ToolCall::new("c1", "calculate", json!({"expression": "2+2"}))];
        let assistant = to_genai_message(&ChatMessage::assistant_tool_calls(calls)).unwrap();
        assert!(matches!(assistant.role, GenaiRole::Assistant));

        let result = to_genai_message(&ChatMessage::tool_result("c1", "4")).unwrap();
        assert!(matches!(result.role, GenaiRole::Tool));
    }

    #[test]
    fn test_tool_call_round_trip_fields() {
        let call = ToolCall::new("c7", "reverse_string", json!({"input": "abc"}));
        let genai_call = to_genai_tool_call(&call).unwrap();
        assert_eq!(genai_call.call_id, "c7");
        assert_eq!(genai_call.fn_name, "reverse_string");

        assert_eq!(from_genai_tool_call(&genai_call, 0), call);
    }

    #[test]
    fn test_missing_call_id_gets_positional_id() {
        let call = ToolCall::new("", "get_current_time", json!({}));
        let genai_call = to_genai_tool_call(&call).unwrap();
        assert_eq!(from_genai_tool_call(&genai_call, 2).id, "call_2");
    }

    #[test]
    fn test_tool_conversion() {
        let descriptor = ToolDescriptor::builder("calculate")
            .description("Evaluates a mathematical expression")
            .required("expression", ParameterType::String, "The expression")
            .handler_fn(|_| Ok(String::new()))
            .build()
            .unwrap();

        let tools = to_genai_tools(&[Tool::from(&descriptor)]);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "calculate");
        assert_eq!(tools[0].schema.as_ref(), Some(&descriptor.input_schema()));

        let bare = to_genai_tool(&Tool::new("get_current_time", "Returns the time"));
        assert!(bare.schema.is_none());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(normalize_endpoint("http://localhost:8080/v1"), "http://localhost:8080/v1/");
        assert_eq!(normalize_endpoint("http://localhost:8080/v1/"), "http://localhost:8080/v1/");
        assert_eq!(default_endpoint("github"), Some("https://models.github.ai/inference/"));
        assert_eq!(default_endpoint("openai"), None);
    }

    #[test]
    fn test_provider_detection() {
        assert!(is_genai_native("openai"));
        assert!(is_genai_native("Anthropic"));
        assert!(!is_genai_native("github"));
        assert!(!is_genai_native("openrouter"));
    }

    #[test]
    fn test_options() {
        let mut config = AgentConfig::mock();
        config.max_tokens = Some(256);
        let options = to_genai_options(&config);
        assert_eq!(options.temperature, Some(0.0));
        assert_eq!(options.max_tokens, Some(256));
    }
}
