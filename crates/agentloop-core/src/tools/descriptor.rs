//! Tool descriptors
//!
//! A descriptor is declared once with [`ToolDescriptor::builder`]; both the
//! callable handler and the JSON Schema sent to the model come from that
//! single declaration.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::error::{ToolError, ToolFailure};
use crate::types::Tool;

/// Type tag of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParameterType {
    /// JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Integer => "integer",
            ParameterType::Boolean => "boolean",
        }
    }
}

/// A declared tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    /// A parameter the model must supply
    pub fn required(
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// A parameter the model may omit
    pub fn optional(
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Arguments passed to a tool handler, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the raw arguments produced by the model
    ///
    /// Objects map directly and `null` means no arguments. Some providers
    /// double-encode the object as a JSON string, so a string that parses to
    /// an object is accepted too.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            Value::String(raw) if raw.trim().is_empty() => Ok(Self::default()),
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => Ok(Self(map)),
                _ => Err(format!("expected a JSON object, got string {:?}", raw)),
            },
            other => Err(format!("expected a JSON object, got {}", other)),
        }
    }

    /// Add an argument (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_str())
    }

    /// Whether a non-null value was supplied for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Executable side of a tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArguments) -> Result<String, ToolFailure>;
}

/// Adapts a synchronous closure into a [`ToolHandler`]
struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&ToolArguments) -> Result<String, ToolFailure> + Send + Sync,
{
    async fn call(&self, args: ToolArguments) -> Result<String, ToolFailure> {
        (self.0)(&args)
    }
}

/// A registered tool: metadata plus handler
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Start declaring a tool
    pub fn builder(name: impl Into<String>) -> ToolDescriptorBuilder {
        ToolDescriptorBuilder {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Names of required parameters absent from `args`, in declaration order
    pub fn missing_required<'a>(&'a self, args: &ToolArguments) -> Vec<&'a str> {
        self.parameters
            .iter()
            .filter(|p| p.required && !args.contains(&p.name))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// JSON Schema describing the parameters
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.kind.as_str(), "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl From<&ToolDescriptor> for Tool {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Tool::new(descriptor.name.clone(), descriptor.description.clone())
            .with_schema(descriptor.input_schema())
    }
}

/// Builder returned by [`ToolDescriptor::builder`]
pub struct ToolDescriptorBuilder {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    handler: Option<Arc<dyn ToolHandler>>,
}

impl ToolDescriptorBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Shorthand for a required parameter
    pub fn required(
        self,
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        self.parameter(ToolParameter::required(name, kind, description))
    }

    /// Shorthand for an optional parameter
    pub fn optional(
        self,
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        self.parameter(ToolParameter::optional(name, kind, description))
    }

    /// Use an async handler
    pub fn handler(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Use a synchronous closure as the handler
    pub fn handler_fn<F>(self, f: F) -> Self
    where
        F: Fn(&ToolArguments) -> Result<String, ToolFailure> + Send + Sync + 'static,
    {
        self.handler(FnHandler(f))
    }

    pub fn build(self) -> Result<ToolDescriptor, ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::InvalidDescriptor("tool name is empty".into()));
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(ToolError::InvalidDescriptor(format!(
                    "tool '{}' declares parameter '{}' twice",
                    self.name, parameter.name
                )));
            }
        }

        let handler = self.handler.ok_or_else(|| {
            ToolError::InvalidDescriptor(format!("tool '{}' has no handler", self.name))
        })?;

        Ok(ToolDescriptor {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            handler,
        })
    }
}
