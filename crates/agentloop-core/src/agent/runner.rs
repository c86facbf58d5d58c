//! Agent orchestrator

use std::collections::HashSet;
use std::sync::Arc;

use super::error::{TurnError, TurnOutcome, TurnResult};
use crate::config::{AgentConfig, DEFAULT_MAX_ROUNDS};
use crate::conversation::{Conversation, ConversationError};
use crate::gateway::{GatewayError, ModelGateway, ModelResponse};
use crate::logging::Logger;
use crate::tools::ToolRegistry;
use crate::types::{CancellationToken, ChatMessage, ToolCall};
use crate::{log_debug, log_error, log_info, log_warn};

/// Loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentOptions {
    /// Tool-call rounds allowed per turn
    pub max_rounds: usize,
    /// Run the calls of one round concurrently
    pub parallel_tool_calls: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            parallel_tool_calls: true,
        }
    }
}

impl From<&AgentConfig> for AgentOptions {
    fn from(config: &AgentConfig) -> Self {
        Self {
            max_rounds: config.max_rounds,
            parallel_tool_calls: config.parallel_tool_calls,
        }
    }
}

/// Where a turn is in the loop
#[derive(Debug)]
enum TurnState {
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Done(String),
    Failed(TurnError),
}

impl TurnState {
    fn name(&self) -> &'static str {
        match self {
            TurnState::AwaitingModel => "AwaitingModel",
            TurnState::ExecutingTools(_) => "ExecutingTools",
            TurnState::Done(_) => "Done",
            TurnState::Failed(_) => "Failed",
        }
    }
}

/// Runs user turns against one conversation
///
/// The registry and gateway are shared; the conversation belongs to this
/// agent. Turns are processed one at a time (`&mut self`).
pub struct Agent {
    gateway: Arc<dyn ModelGateway>,
    registry: Arc<ToolRegistry>,
    conversation: Conversation,
    options: AgentOptions,
    logger: Arc<dyn Logger>,
}

impl Agent {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<ToolRegistry>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            gateway,
            registry,
            conversation: Conversation::new(),
            options: AgentOptions::default(),
            logger,
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the system prompt (builder style)
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Result<Self, ConversationError> {
        self.set_system_prompt(prompt)?;
        Ok(self)
    }

    /// Set the system prompt; only allowed before the first turn
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) -> Result<(), ConversationError> {
        self.conversation.set_system_prompt(prompt)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn options(&self) -> AgentOptions {
        self.options
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run one turn to completion
    pub async fn run_turn(&mut self, query: &str) -> TurnOutcome {
        self.run_turn_with_cancel(query, &CancellationToken::new())
            .await
    }

    /// Run one turn, stopping early if `cancel` fires
    ///
    /// A cancelled turn leaves the conversation exactly as it was before the
    /// turn started.
    pub async fn run_turn_with_cancel(
        &mut self,
        query: &str,
        cancel: &CancellationToken,
    ) -> TurnOutcome {
        log_info!(self.logger, "[Agent] Turn started: {}", query);
        let checkpoint = self.conversation.checkpoint();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TurnError::Cancelled),
            result = self.drive(query) => result,
        };

        match &result {
            Ok(_) => log_info!(self.logger, "[Agent] Turn completed"),
            Err(TurnError::Cancelled) => {
                self.conversation.restore(checkpoint);
                log_warn!(self.logger, "[Agent] Turn cancelled, transcript rolled back");
            }
            Err(e) => log_error!(self.logger, "[Agent] Turn failed: {}", e),
        }

        TurnOutcome::from(result)
    }

    async fn drive(&mut self, query: &str) -> TurnResult<String> {
        self.conversation.append(ChatMessage::user(query))?;

        let mut rounds = 0;
        let mut state = TurnState::AwaitingModel;
        loop {
            let next = match state {
                TurnState::Done(text) => return Ok(text),
                TurnState::Failed(e) => return Err(e),
                TurnState::AwaitingModel => self.await_model(&mut rounds).await,
                TurnState::ExecutingTools(calls) => self.execute_tools(calls).await,
            }
            .unwrap_or_else(TurnState::Failed);

            log_debug!(self.logger, "[Agent] -> {}", next.name());
            state = next;
        }
    }

    async fn await_model(&mut self, rounds: &mut usize) -> TurnResult<TurnState> {
        let response = self
            .gateway
            .complete(self.conversation.snapshot(), &self.registry.schemas())
            .await?;

        match response {
            ModelResponse::FinalAnswer(text) => {
                self.conversation.append(ChatMessage::assistant(text.clone()))?;
                Ok(TurnState::Done(text))
            }
            ModelResponse::ToolCallsRequested(calls) if calls.is_empty() => {
                Err(TurnError::Gateway(GatewayError::invalid_response(
                    self.gateway.name(),
                    "empty tool call list",
                )))
            }
            ModelResponse::ToolCallsRequested(calls) => {
                if let Some(id) = first_invalid_call_id(&calls) {
                    return Err(TurnError::Gateway(GatewayError::invalid_response(
                        self.gateway.name(),
                        format!("tool call id '{}' is empty or repeated", id),
                    )));
                }
                if *rounds >= self.options.max_rounds {
                    return Err(TurnError::MaxIterationsExceeded {
                        max_rounds: self.options.max_rounds,
                    });
                }
                *rounds += 1;

                log_info!(
                    self.logger,
                    "[Agent] Round {}: {} tool call(s)",
                    rounds,
                    calls.len()
                );
                self.conversation
                    .append(ChatMessage::assistant_tool_calls(calls.clone()))?;
                Ok(TurnState::ExecutingTools(calls))
            }
        }
    }

    async fn execute_tools(&mut self, calls: Vec<ToolCall>) -> TurnResult<TurnState> {
        let results = self
            .registry
            .execute_tool_calls(&calls, self.options.parallel_tool_calls)
            .await;

        for result in results {
            self.conversation
                .append(ChatMessage::tool_result(result.call_id, result.content))?;
        }
        Ok(TurnState::AwaitingModel)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("gateway", &self.gateway.name())
            .field("registry", &self.registry)
            .field("messages", &self.conversation.len())
            .field("options", &self.options)
            .finish()
    }
}

/// First call id in a round that is empty or already used
fn first_invalid_call_id(calls: &[ToolCall]) -> Option<&str> {
    let mut seen = HashSet::new();
    calls
        .iter()
        .map(|call| call.id.as_str())
        .find(|id| id.is_empty() || !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::logging::NoOpLogger;
    use crate::tools::builtin::{register_builtin_tools, SystemClock, CALCULATOR_TOOL};
    use crate::tools::{
        ParameterType, ToolArguments, ToolDescriptor, ToolFailure, ToolHandler,
    };
    use crate::types::MessageRole;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    const SYSTEM: &str = "You are a professional and helpful AI assistant.";

    fn builtin_registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new(NoOpLogger::shared());
        register_builtin_tools(&mut registry, Arc::new(SystemClock)).unwrap();
        Arc::new(registry)
    }

    fn agent(gateway: Arc<MockGateway>, registry: Arc<ToolRegistry>) -> Agent {
        Agent::new(gateway, registry, NoOpLogger::shared())
            .with_system_prompt(SYSTEM)
            .unwrap()
    }

    fn calc(id: &str, expression: &str) -> ToolCall {
        ToolCall::new(id, CALCULATOR_TOOL, json!({ "expression": expression }))
    }

    fn tool_results(agent: &Agent) -> Vec<&ChatMessage> {
        agent
            .conversation()
            .snapshot()
            .iter()
            .filter(|m| m.role == MessageRole::ToolResult)
            .collect()
    }

    struct Sleepy {
        finished: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ToolHandler for Sleepy {
        async fn call(&self, args: ToolArguments) -> Result<String, ToolFailure> {
            let ms = args.get("ms").and_then(|v| v.as_u64()).unwrap_or(0);
            let label = args.get_str("label").unwrap_or_default().to_string();
            tokio::time::sleep(Duration::from_millis(ms)).await;
            self.finished.lock().push(label.clone());
            Ok(label)
        }
    }

    fn sleepy_registry(finished: Arc<Mutex<Vec<String>>>) -> Arc<ToolRegistry> {
        let tool = ToolDescriptor::builder("sleepy")
            .description("Sleeps, then returns its label")
            .required("label", ParameterType::String, "Returned text")
            .required("ms", ParameterType::Integer, "Milliseconds to sleep")
            .handler(Sleepy { finished })
            .build()
            .unwrap();
        Arc::new(ToolRegistry::new(NoOpLogger::shared()).with_tool(tool).unwrap())
    }

    fn sleepy(id: &str, ms: u64) -> ToolCall {
        ToolCall::new(id, "sleepy", json!({ "label": id, "ms": ms }))
    }

    #[tokio::test]
    async fn test_happy_path() {
        let gateway = Arc::new(MockGateway::scripted(
            vec![
                ModelResponse::tool_calls(vec![calc("call_1", "25 * 4 + 10")]),
                ModelResponse::answer("The result is 110."),
            ],
            NoOpLogger::shared(),
        ));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry());

        let outcome = agent.run_turn("What is 25 * 4 + 10?").await;
        assert_eq!(outcome.text(), Some("The result is 110."));

        let results = tool_results(&agent);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "110");
        assert_eq!(results[0].tool_call_id.as_deref(), Some("call_1"));

        let roles: Vec<_> = agent.conversation().snapshot().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::ToolResult,
                MessageRole::Assistant,
            ]
        );

        // The second request saw the tool result and all three tools
        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].transcript.len(), 4);
        assert_eq!(requests[1].tool_names.len(), 3);
    }

    #[tokio::test]
    async fn test_round_limit() {
        let gateway = Arc::new(MockGateway::repeat(
            ModelResponse::tool_calls(vec![calc("loop", "1 + 1")]),
            NoOpLogger::shared(),
        ));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry()).with_options(AgentOptions {
            max_rounds: 3,
            parallel_tool_calls: true,
        });

        let outcome = agent.run_turn("loop forever").await;
        assert!(matches!(
            outcome,
            TurnOutcome::Failed(TurnError::MaxIterationsExceeded { max_rounds: 3 })
        ));
        assert_eq!(gateway.call_count(), 4);
        assert_eq!(tool_results(&agent).len(), 3);

        // The rejected request was not appended
        let last = agent.conversation().last().unwrap();
        assert_eq!(last.role, MessageRole::ToolResult);
        assert_eq!(agent.conversation().pending_tool_calls().count(), 0);
    }

    #[tokio::test]
    async fn test_results_keep_call_order() {
        let finished = Arc::new(Mutex::new(Vec::new()));
        let gateway = Arc::new(MockGateway::scripted(
            vec![
                ModelResponse::tool_calls(vec![sleepy("a", 60), sleepy("b", 10), sleepy("c", 30)]),
                ModelResponse::answer("done"),
            ],
            NoOpLogger::shared(),
        ));
        let mut agent = agent(gateway, sleepy_registry(Arc::clone(&finished)));

        assert!(agent.run_turn("go").await.is_final());

        assert_eq!(*finished.lock(), vec!["b", "c", "a"]);
        let ids: Vec<_> = tool_results(&agent)
            .iter()
            .map(|m| m.tool_call_id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_sequential_execution() {
        let finished = Arc::new(Mutex::new(Vec::new()));
        let gateway = Arc::new(MockGateway::scripted(
            vec![
                ModelResponse::tool_calls(vec![sleepy("a", 30), sleepy("b", 1)]),
                ModelResponse::answer("done"),
            ],
            NoOpLogger::shared(),
        ));
        let mut agent = agent(gateway, sleepy_registry(Arc::clone(&finished))).with_options(
            AgentOptions {
                parallel_tool_calls: false,
                ..AgentOptions::default()
            },
        );

        assert!(agent.run_turn("go").await.is_final());
        assert_eq!(*finished.lock(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_tool_errors_stay_in_conversation() {
        let gateway = Arc::new(MockGateway::scripted(
            vec![
                ModelResponse::tool_calls(vec![
                    ToolCall::new("u1", "weather", json!({"city": "Oslo"})),
                    calc("c1", "1/0"),
                    ToolCall::new("m1", CALCULATOR_TOOL, json!({})),
                ]),
                ModelResponse::answer("Sorry, I could not do that."),
            ],
            NoOpLogger::shared(),
        ));
        let mut agent = agent(gateway, builtin_registry());

        let outcome = agent.run_turn("weather and maths").await;
        assert_eq!(outcome.text(), Some("Sorry, I could not do that."));

        let results = tool_results(&agent);
        assert_eq!(results.len(), 3);
        assert!(results[0].content.starts_with("Error:"));
        assert!(results[0].content.contains("weather"));
        assert!(results[1].content.starts_with("Error:"));
        assert!(results[2].content.starts_with("Error:"));
        assert!(results[2].content.contains("expression"));
    }

    #[tokio::test]
    async fn test_gateway_error_fails_turn() {
        let gateway = Arc::new(MockGateway::error("service unavailable", NoOpLogger::shared()));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry());

        let outcome = agent.run_turn("hello").await;
        assert!(matches!(outcome, TurnOutcome::Failed(TurnError::Gateway(_))));
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(agent.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_tool_call_list_is_invalid() {
        let gateway = Arc::new(MockGateway::repeat(
            ModelResponse::tool_calls(Vec::new()),
            NoOpLogger::shared(),
        ));
        let mut agent = agent(gateway, builtin_registry());

        let outcome = agent.run_turn("hello").await;
        assert!(matches!(
            outcome,
            TurnOutcome::Failed(TurnError::Gateway(GatewayError::InvalidResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_repeated_call_ids_are_invalid() {
        let gateway = Arc::new(MockGateway::scripted(
            vec![ModelResponse::tool_calls(vec![calc("x", "1 + 1"), calc("x", "2 + 2")])],
            NoOpLogger::shared(),
        ));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry());

        let outcome = agent.run_turn("add twice").await;
        assert!(matches!(
            outcome,
            TurnOutcome::Failed(TurnError::Gateway(GatewayError::InvalidResponse { ref message, .. }))
                if message.contains("'x'")
        ));
        assert_eq!(agent.conversation().len(), 2);
        assert_eq!(agent.conversation().pending_tool_calls().count(), 0);

        let calls = [calc("a", "1"), calc("", "2")];
        let blank = first_invalid_call_id(&calls);
        assert_eq!(blank, Some(""));
        assert_eq!(first_invalid_call_id(&[calc("a", "1"), calc("b", "2")]), None);
    }

    #[tokio::test]
    async fn test_cancel_while_awaiting_model() {
        let gateway = Arc::new(
            MockGateway::fixed("too late", NoOpLogger::shared())
                .with_delay(Duration::from_secs(5)),
        );
        let mut agent = agent(gateway, builtin_registry());

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = agent.run_turn_with_cancel("slow question", &token).await;
        assert!(matches!(outcome, TurnOutcome::Failed(TurnError::Cancelled)));
        assert_eq!(agent.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_executing_tools() {
        let finished = Arc::new(Mutex::new(Vec::new()));
        let gateway = Arc::new(MockGateway::scripted_with_fallback(
            vec![ModelResponse::tool_calls(vec![sleepy("slow", 5_000)])],
            ModelResponse::answer("recovered"),
            NoOpLogger::shared(),
        ));
        let mut agent = agent(gateway, sleepy_registry(Arc::clone(&finished)));

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = agent.run_turn_with_cancel("go", &token).await;
        assert!(matches!(outcome, TurnOutcome::Failed(TurnError::Cancelled)));
        assert_eq!(agent.conversation().len(), 1);
        assert_eq!(agent.conversation().pending_tool_calls().count(), 0);
        assert!(finished.lock().is_empty());

        // The conversation is usable again
        assert_eq!(agent.run_turn("again").await.text(), Some("recovered"));
    }

    #[tokio::test]
    async fn test_already_cancelled_appends_nothing() {
        let gateway = Arc::new(MockGateway::echo(NoOpLogger::shared()));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry());

        let token = CancellationToken::new();
        token.cancel();
        let outcome = agent.run_turn_with_cancel("hi", &token).await;
        assert!(matches!(outcome, TurnOutcome::Failed(TurnError::Cancelled)));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(agent.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_history_shared_across_turns() {
        let gateway = Arc::new(MockGateway::echo(NoOpLogger::shared()));
        let mut agent = agent(Arc::clone(&gateway), builtin_registry());

        assert_eq!(agent.run_turn("first").await.text(), Some("Echo: first"));
        assert_eq!(agent.run_turn("second").await.text(), Some("Echo: second"));

        assert_eq!(agent.conversation().len(), 5);
        assert_eq!(gateway.last_transcript().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_system_prompt_only_before_first_turn() {
        let gateway = Arc::new(MockGateway::echo(NoOpLogger::shared()));
        let mut agent = Agent::new(gateway, builtin_registry(), NoOpLogger::shared());

        agent.run_turn("hi").await;
        assert_eq!(
            agent.set_system_prompt(SYSTEM),
            Err(ConversationError::SystemPromptLocked)
        );
        assert_eq!(agent.conversation().system_prompt(), None);
    }

    #[test]
    fn test_options_from_config() {
        let config = AgentConfig {
            max_rounds: 2,
            parallel_tool_calls: false,
            ..AgentConfig::mock()
        };
        assert_eq!(
            AgentOptions::from(&config),
            AgentOptions {
                max_rounds: 2,
                parallel_tool_calls: false
            }
        );
        assert_eq!(AgentOptions::default().max_rounds, 5);
    }
}
