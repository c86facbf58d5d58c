//! Tool registry for LLM tool calling
//!
//! The ToolRegistry is the central component for:
//! - Holding the tools available to the model, in registration order
//! - Converting descriptors to the provider-neutral `Tool` schema
//! - Validating arguments and routing calls to handlers
//! - Turning tool calls from a model response into `ToolResult`s

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use super::descriptor::{ToolArguments, ToolDescriptor};
use super::error::ToolError;
use crate::logging::Logger;
use crate::types::{Tool, ToolCall, ToolResult};
use crate::{log_debug, log_info, log_warn};

/// Registry of callable tools
///
/// Built once at startup, then shared read-only (usually behind an `Arc`).
pub struct ToolRegistry {
    /// Descriptors in registration order
    tools: Vec<ToolDescriptor>,
    /// Name -> position in `tools`
    index: HashMap<String, usize>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            logger,
        }
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(ToolError::DuplicateTool(descriptor.name().to_string()));
        }

        log_debug!(self.logger, "[ToolRegistry] Registered tool: {}", descriptor.name());
        self.index
            .insert(descriptor.name().to_string(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Register a tool (builder style)
    pub fn with_tool(mut self, descriptor: ToolDescriptor) -> Result<Self, ToolError> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// All descriptors in registration order
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Whether a tool with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool schemas for sending to the model, in registration order
    pub fn schemas(&self) -> Vec<Tool> {
        self.tools.iter().map(Tool::from).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name
    ///
    /// Only checks that required parameters are present; extra arguments are
    /// ignored and values are not validated beyond that.
    pub async fn invoke(&self, name: &str, arguments: ToolArguments) -> Result<String, ToolError> {
        let tool = self.resolve(name)?;

        let missing = tool.missing_required(&arguments);
        if !missing.is_empty() {
            return Err(ToolError::invalid_arguments(
                name,
                format!("missing required parameter(s): {}", missing.join(", ")),
            ));
        }

        log_info!(self.logger, "[ToolRegistry] Calling tool: {}", name);

        tool.handler()
            .call(arguments)
            .await
            .map_err(|failure| ToolError::execution(name, failure.message()))
    }

    /// Execute a tool call from an LLM response
    ///
    /// Failures become an error `ToolResult` whose content starts with `Error:`.
    pub async fn execute_tool_call(&self, tool_call: &ToolCall) -> ToolResult {
        let outcome = match ToolArguments::from_value(tool_call.arguments.clone()) {
            Ok(arguments) => self.invoke(&tool_call.name, arguments).await,
            Err(message) => Err(ToolError::invalid_arguments(&tool_call.name, message)),
        };

        match outcome {
            Ok(content) => ToolResult::success(&tool_call.id, content),
            Err(e) => {
                log_warn!(
                    self.logger,
                    "[ToolRegistry] Tool call {} ({}) failed: {}",
                    tool_call.id,
                    tool_call.name,
                    e
                );
                ToolResult::error(&tool_call.id, format!("Error: {}", e))
            }
        }
    }

    /// Execute multiple tool calls
    ///
    /// With `parallel` the calls run concurrently on the current task. Either
    /// way the results come back in the same order as `tool_calls`.
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall], parallel: bool) -> Vec<ToolResult> {
        if parallel && tool_calls.len() > 1 {
            return join_all(tool_calls.iter().map(|call| self.execute_tool_call(call))).await;
        }

        let mut results = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            results.push(self.execute_tool_call(call).await);
        }
        results
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
