//! Turn outcomes and errors

use thiserror::Error;

use crate::conversation::ConversationError;
use crate::gateway::GatewayError;

/// Why a turn failed
#[derive(Error, Debug)]
pub enum TurnError {
    /// The gateway failed; never retried
    #[error("model gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The model kept asking for tools past the round limit
    #[error("exceeded the limit of {max_rounds} tool-call round(s)")]
    MaxIterationsExceeded { max_rounds: usize },

    /// The caller cancelled the turn
    #[error("turn cancelled")]
    Cancelled,

    /// A message could not be appended to the transcript
    #[error("conversation error: {0}")]
    Conversation(#[from] ConversationError),
}

pub type TurnResult<T> = Result<T, TurnError>;

/// Result of one user turn
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model's final answer
    Final(String),
    /// The turn ended without an answer
    Failed(TurnError),
}

impl TurnOutcome {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }

    /// The final answer, if there is one
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Final(text) => Some(text.as_str()),
            Self::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> TurnResult<String> {
        match self {
            Self::Final(text) => Ok(text),
            Self::Failed(e) => Err(e),
        }
    }
}

impl From<TurnResult<String>> for TurnOutcome {
    fn from(result: TurnResult<String>) -> Self {
        match result {
            Ok(text) => Self::Final(text),
            Err(e) => Self::Failed(e),
        }
    }
}
