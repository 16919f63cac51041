//! Shared test helpers and mock backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use agentforge::backend::{ChatBackend, Completion, CompletionOptions};
use agentforge::error::ForgeError;
use agentforge::types::{Message, ToolCall};

/// A request observed by [`MockBackend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

/// A backend that returns canned completions in order.
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<Completion, ForgeError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_text(&self, text: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Completion::answer(text)));
        self
    }

    /// Queue a single tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: &str) -> &Self {
        self.queue_tool_calls(vec![ToolCall::new(id, name, args)])
    }

    /// Queue a response with several tool calls.
    pub fn queue_tool_calls(&self, calls: Vec<ToolCall>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Completion::requesting(calls)));
        self
    }

    /// Queue a backend failure.
    pub fn queue_error(&self, error: ForgeError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn backend_name(&self) -> &str {
        "mock"
    }

    async fn complete_chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ForgeError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Completion::answer("Mock response")))
    }
}
