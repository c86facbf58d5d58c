//! Conversation state
//!
//! The transcript of one conversation. Messages are only ever appended, and
//! every append is checked against the tool-call linking rules:
//!
//! - a system prompt is the first message and is set at most once
//! - tool calls only appear on assistant messages
//! - each `tool_result` answers the next outstanding call of the preceding
//!   assistant message, in the order the calls were issued
//! - no user or assistant message while results are outstanding

use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::types::{ChatMessage, MessageRole};

/// Transcript invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("system prompt is already set")]
    SystemPromptAlreadySet,

    #[error("system prompt must be set before the first turn")]
    SystemPromptLocked,

    #[error("{0} message cannot carry tool calls")]
    MisplacedToolCalls(MessageRole),

    #[error("tool call id '{0}' is empty or repeated")]
    InvalidToolCallId(String),

    #[error("tool result without a tool call id")]
    MissingToolCallId,

    #[error("tool result for '{got}' does not answer the next outstanding call ({expected})")]
    UnexpectedToolResult { got: String, expected: String },

    #[error("cannot append {role} message: {outstanding} tool result(s) outstanding")]
    PendingToolResults { role: MessageRole, outstanding: usize },
}

pub type ConversationResult<T> = Result<T, ConversationError>;

/// Position in the transcript a turn can be rolled back to
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    len: usize,
    pending: VecDeque<String>,
}

/// Ordered, append-only transcript
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    /// Ids of issued calls still waiting for a result, in issue order
    pending: VecDeque<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(prompt)],
            pending: VecDeque::new(),
        }
    }

    /// Set the system prompt; only allowed on an empty transcript
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) -> ConversationResult<()> {
        self.append(ChatMessage::system(prompt))
    }

    /// Append a message, enforcing the transcript invariants
    pub fn append(&mut self, message: ChatMessage) -> ConversationResult<()> {
        if message.role != MessageRole::Assistant && !message.tool_calls.is_empty() {
            return Err(ConversationError::MisplacedToolCalls(message.role));
        }

        match message.role {
            MessageRole::System => {
                if self.system_prompt().is_some() {
                    return Err(ConversationError::SystemPromptAlreadySet);
                }
                if !self.messages.is_empty() {
                    return Err(ConversationError::SystemPromptLocked);
                }
            }
            MessageRole::ToolResult => {
                let id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or(ConversationError::MissingToolCallId)?;
                if self.pending.front().map(String::as_str) != Some(id) {
                    return Err(ConversationError::UnexpectedToolResult {
                        got: id.to_string(),
                        expected: self
                            .pending
                            .front()
                            .cloned()
                            .unwrap_or_else(|| "none".to_string()),
                    });
                }
                self.pending.pop_front();
            }
            MessageRole::User | MessageRole::Assistant => {
                if !self.pending.is_empty() {
                    return Err(ConversationError::PendingToolResults {
                        role: message.role,
                        outstanding: self.pending.len(),
                    });
                }

                let mut seen = HashSet::new();
                for call in &message.tool_calls {
                    if call.id.is_empty() || !seen.insert(call.id.as_str()) {
                        return Err(ConversationError::InvalidToolCallId(call.id.clone()));
                    }
                }
                self.pending
                    .extend(message.tool_calls.iter().map(|c| c.id.clone()));
            }
        }

        self.messages.push(message);
        Ok(())
    }

    /// Read-only view of the transcript
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The system prompt, if one was set
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
    }

    /// Ids of issued tool calls that have no result yet
    pub fn pending_tool_calls(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.messages.len(),
            pending: self.pending.clone(),
        }
    }

    /// Drop everything appended since `checkpoint`
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.messages.truncate(checkpoint.len);
        self.pending = checkpoint.pending;
    }
}
