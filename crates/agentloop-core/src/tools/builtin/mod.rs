//! Built-in tools shipped with the agent runtime
//!
//! - `get_current_time`: local date and time
//! - `calculate`: arithmetic over `+ - * /` and parentheses
//! - `reverse_string`: reverses text by grapheme cluster

mod calculator;
mod clock;
mod text;

use std::sync::Arc;

pub use calculator::{calculate, calculator_tool, evaluate, format_number, CalcError, CALCULATOR_TOOL};
pub use clock::{clock_tool, current_time, Clock, FixedClock, SystemClock, CLOCK_TOOL};
pub use text::{reverse, reverse_string_tool, REVERSE_TOOL};

use super::descriptor::ToolDescriptor;
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Descriptors for every built-in tool, in registration order
pub fn builtin_tools(clock: Arc<dyn Clock>) -> Result<Vec<ToolDescriptor>, ToolError> {
    Ok(vec![clock_tool(clock)?, calculator_tool()?, reverse_string_tool()?])
}

/// Register all built-in tools
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    clock: Arc<dyn Clock>,
) -> Result<(), ToolError> {
    for tool in builtin_tools(clock)? {
        registry.register(tool)?;
    }
    Ok(())
}
