//! Model gateway implementations
//!
//! The gateway is the boundary between the agent loop and the remote
//! completion provider. Given a transcript and the tool schemas it returns
//! either a final answer or the tool calls the model wants made.
//!
//! ## Architecture
//!
//! Real providers go through the `genai` crate, which handles the
//! provider-specific protocols and tool calling. Providers genai has no
//! adapter for (GitHub Models, OpenRouter, custom endpoints) are routed
//! through its OpenAI adapter with a `ServiceTargetResolver`.
//!
//! Auth comes from the resolved [`AgentConfig`], not genai's env var lookup.
//!
//! The `MockGateway` is kept for tests and offline runs.

mod error;
mod genai_adapter;
mod genai_gateway;
mod mock;
mod traits;

pub use error::{GatewayError, GatewayResult};
pub use genai_adapter::{is_genai_native, ProviderConfig};
pub use genai_gateway::GenaiGateway;
pub use mock::{MockGateway, MockMode, RecordedRequest};
pub use traits::{ModelGateway, ModelResponse};

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::logging::Logger;

/// Create the gateway for a resolved configuration
///
/// Provider `mock` gives the echo mock; everything else goes through genai.
pub fn create_gateway(
    config: &AgentConfig,
    logger: Arc<dyn Logger>,
) -> GatewayResult<Arc<dyn ModelGateway>> {
    if config.is_mock() {
        return Ok(Arc::new(MockGateway::echo(logger)));
    }
    Ok(Arc::new(GenaiGateway::new(config, logger)?))
}
