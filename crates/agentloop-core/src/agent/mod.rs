//! Agent loop
//!
//! Drives a single user turn to completion:
//!
//! ```text
//!   user message
//!        │
//!        ▼
//!   AwaitingModel ──FinalAnswer──────────────▶ Done
//!     ▲      │
//!     │      └─ToolCallsRequested──▶ ExecutingTools
//!     │                                   │
//!     └────── tool_result per call ───────┘
//!
//!   gateway error / round limit / cancel ──▶ Failed
//! ```

mod error;
mod runner;

pub use error::{TurnError, TurnOutcome, TurnResult};
pub use runner::{Agent, AgentOptions};
