//! Tool management module
//!
//! Tools are declared once as [`ToolDescriptor`]s, collected in a
//! [`ToolRegistry`] and invoked by the agent loop when the model asks for them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolDescriptor                             │
//! │    name, description, parameters, handler   │
//! └─────────────────────────────────────────────┘
//!           │ register (unique names)
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - schemas()      -> model request          │
//! │  - invoke()       -> checks required args   │
//! │  - execute_tool_calls() -> ToolResults,     │
//! │    same order as the calls                  │
//! └─────────────────────────────────────────────┘
//!           │ failures become "Error: ..." text
//!           ▼
//!       tool_result messages
//! ```

pub mod builtin;
mod descriptor;
mod error;
mod registry;

pub use descriptor::{
    ParameterType, ToolArguments, ToolDescriptor, ToolDescriptorBuilder, ToolHandler,
    ToolParameter,
};
pub use error::{ToolError, ToolFailure};
pub use registry::ToolRegistry;
