//! Chat-completion backend trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "azure")]
pub mod azure;

use async_trait::async_trait;

use crate::agent::OutputSpec;
use crate::error::ForgeError;
use crate::tools::{ToolChoice, ToolDescriptor};
use crate::types::{Message, ToolCall};

/// Per-request options sent alongside the message history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub tools: Vec<ToolDescriptor>,
    /// Only set when `tools` is non-empty.
    pub tool_choice: Option<ToolChoice>,
    /// Only set when `tools` is non-empty.
    pub parallel_tool_calls: Option<bool>,
    pub response_format: Option<OutputSpec>,
}

/// One completion returned by a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// A plain text answer.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A response requesting tool calls.
    pub fn requesting(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: None,
            tool_calls,
        }
    }
}

/// A chat-completion service.
///
/// Implementations perform exactly one request per call; errors are returned
/// to the caller unchanged, without retries.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name (e.g., "openai", "azure").
    fn backend_name(&self) -> &str;

    async fn complete_chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ForgeError>;
}
