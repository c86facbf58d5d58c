//! Clock tool

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::tools::descriptor::ToolDescriptor;
use crate::tools::error::ToolError;

/// Name the clock tool is registered under
pub const CLOCK_TOOL: &str = "get_current_time";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Current time as `YYYY-MM-DD HH:MM:SS`
pub fn current_time(clock: &dyn Clock) -> String {
    clock.now().format(TIMESTAMP_FORMAT).to_string()
}

/// Descriptor for the clock tool
pub fn clock_tool(clock: Arc<dyn Clock>) -> Result<ToolDescriptor, ToolError> {
    ToolDescriptor::builder(CLOCK_TOOL)
        .description(
            "Returns the current date and time. Use this when you need to know what time it is.",
        )
        .handler_fn(move |_| Ok(current_time(clock.as_ref())))
        .build()
}
