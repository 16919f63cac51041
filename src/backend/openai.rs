//! OpenAI Chat Completions backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ForgeError;
use crate::types::{Message, ToolCall};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{ChatBackend, Completion, CompletionOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Backend for the OpenAI Chat Completions API (and compatible servers).
pub struct OpenAiBackend {
    api_key: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn backend_name(&self) -> &str {
        "openai"
    }

    async fn complete_chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ForgeError> {
        let body = build_request_body(Some(model), messages, options);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model, tools = options.tools.len(), "OpenAI complete_chat");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        parse_response(resp).await
    }
}

/// Build the Chat Completions request body. Azure deployments carry the
/// model in the URL, so `model` is optional.
pub(crate) fn build_request_body(
    model: Option<&str>,
    messages: &[Message],
    options: &CompletionOptions,
) -> Value {
    let mut obj = Map::new();
    if let Some(model) = model {
        obj.insert("model".into(), model.into());
    }
    obj.insert(
        "messages".into(),
        messages.iter().map(message_to_openai).collect::<Vec<_>>().into(),
    );

    if !options.tools.is_empty() {
        let tool_defs: Vec<Value> = options
            .tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect();
        obj.insert("tools".into(), tool_defs.into());
    }
    if let Some(ref choice) = options.tool_choice {
        obj.insert("tool_choice".into(), choice.to_wire());
    }
    if let Some(parallel) = options.parallel_tool_calls {
        obj.insert("parallel_tool_calls".into(), parallel.into());
    }
    if let Some(ref spec) = options.response_format {
        obj.insert(
            "response_format".into(),
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": spec.name,
                    "description": spec.description,
                    "schema": spec.schema,
                    "strict": spec.strict,
                }
            }),
        );
    }

    Value::Object(obj)
}

pub(crate) async fn parse_response(resp: reqwest::Response) -> Result<Completion, ForgeError> {
    let status = resp.status().as_u16();
    if !(200..300).contains(&status) {
        let body_text = resp.text().await.unwrap_or_default();
        return Err(status_to_error(status, &body_text));
    }

    let data: OpenAiChatResponse = resp.json().await?;
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ForgeError::api(status, "No choices in chat completion response"))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    Ok(Completion {
        text: choice.message.content,
        tool_calls,
    })
}

fn message_to_openai(msg: &Message) -> Value {
    match msg {
        Message::System { content } => json!({ "role": "system", "content": content }),
        Message::User { content } => json!({ "role": "user", "content": content }),
        Message::Assistant {
            content,
            tool_calls,
        } if !tool_calls.is_empty() => {
            let tc_json: Vec<Value> = tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments,
                        }
                    })
                })
                .collect();
            json!({
                "role": "assistant",
                "content": if content.is_empty() { Value::Null } else { Value::String(content.clone()) },
                "tool_calls": tc_json,
            })
        }
        Message::Assistant { content, .. } => json!({ "role": "assistant", "content": content }),
        Message::Tool {
            tool_call_id,
            content,
        } => json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "content": content,
        }),
    }
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}
