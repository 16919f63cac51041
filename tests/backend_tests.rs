//! HTTP backends against a mock server.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agentforge::backend::azure::AzureOpenAiBackend;
use agentforge::backend::openai::OpenAiBackend;
use agentforge::forge::completion_options;
use agentforge::prelude::*;

fn calculator() -> Agent {
    Agent::new("Calculator").with_function(
        Function::new("add", ["a", "b"], |a: i64, b: i64| a + b)
            .with_description("Add two numbers")
            .describe("a", "First addend")
            .describe("b", "Second addend"),
    )
}

fn text_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    }))
}

fn tool_reply(id: &str, name: &str, arguments: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-2",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }))
}

#[tokio::test]
async fn openai_sends_tools_and_parses_tool_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "tool_choice": "auto",
            "parallel_tool_calls": false,
            "tools": [{
                "type": "function",
                "function": {
                    "name": "add",
                    "description": "Add two numbers",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "a": {"type": "number", "description": "First addend"},
                            "b": {"type": "number", "description": "Second addend"}
                        },
                        "required": ["a", "b"]
                    }
                }
            }]
        })))
        .respond_with(tool_reply("call_1", "add", r#"{"a":2,"b":3}"#))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new("test-key", Some(server.uri()));
    let agent = calculator();
    let completion = backend
        .complete_chat(
            agent.model(),
            &[Message::user("2+3?")],
            &completion_options(&agent),
        )
        .await
        .unwrap();

    assert_eq!(completion.text, None);
    assert_eq!(
        completion.tool_calls,
        vec![ToolCall::new("call_1", "add", r#"{"a":2,"b":3}"#)]
    );
}

#[tokio::test]
async fn openai_omits_tool_fields_for_tool_less_agents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(text_reply("hi"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new("test-key", Some(server.uri()));
    let agent = Agent::new("plain");
    let completion = backend
        .complete_chat("gpt-4o", &[Message::user("hello")], &completion_options(&agent))
        .await
        .unwrap();
    assert_eq!(completion.text.as_deref(), Some("hi"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
    assert!(body.get("parallel_tool_calls").is_none());
}

#[tokio::test]
async fn forge_runs_a_full_tool_round_trip_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("tool_call_id"))
        .respond_with(text_reply("2 + 3 = 5"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(tool_reply("call_1", "add", r#"{"a":2,"b":3}"#))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let forge = Forge::new(Arc::new(OpenAiBackend::new("test-key", Some(server.uri()))));
    let response = forge
        .run(calculator(), &[Message::user("2+3?")], RunOptions::default())
        .await
        .unwrap();

    assert_eq!(response.text(), Some("2 + 3 = 5"));
    assert_eq!(response.messages[1], Message::tool("call_1", "5"));

    let requests = server.received_requests().await.unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = second["messages"].as_array().unwrap();
    assert_eq!(messages[0], json!({"role": "system", "content": "You are a helpful agent."}));
    assert_eq!(
        messages[2],
        json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "add", "arguments": "{\"a\":2,\"b\":3}"}
            }]
        })
    );
    assert_eq!(
        messages[3],
        json!({"role": "tool", "tool_call_id": "call_1", "content": "5"})
    );
}

#[tokio::test]
async fn openai_sends_forced_function_choice_and_output_spec() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "tool_choice": {"type": "function", "function": {"name": "add"}},
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "sum", "strict": true}
            }
        })))
        .respond_with(text_reply(r#"{"sum": 5}"#))
        .expect(1)
        .mount(&server)
        .await;

    let agent = calculator().with_tool_choice("add").with_output_spec(
        OutputSpec::new("sum", json!({"type": "object", "properties": {"sum": {"type": "number"}}}))
            .strict(true),
    );
    let backend = OpenAiBackend::new("test-key", Some(server.uri()));
    let completion = backend
        .complete_chat("gpt-4o", &[Message::user("2+3?")], &completion_options(&agent))
        .await
        .unwrap();
    assert_eq!(completion.text.as_deref(), Some(r#"{"sum": 5}"#));
}

#[tokio::test]
async fn azure_uses_deployment_path_and_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/my-gpt4o/chat/completions"))
        .and(query_param("api-version", "2024-06-01"))
        .and(header("api-key", "azure-key"))
        .respond_with(text_reply("from azure"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AzureOpenAiBackend::new(server.uri(), "azure-key", None);
    let completion = backend
        .complete_chat("my-gpt4o", &[Message::user("hi")], &CompletionOptions::default())
        .await
        .unwrap();
    assert_eq!(completion.text.as_deref(), Some("from azure"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn error_statuses_are_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/unauthorized/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/limited/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"message": "slow down", "retry_after": 2}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/broken/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let call = |prefix: &str| {
        let backend = OpenAiBackend::new("k", Some(format!("{}/{prefix}", server.uri())));
        async move {
            backend
                .complete_chat("gpt-4o", &[Message::user("hi")], &CompletionOptions::default())
                .await
                .unwrap_err()
        }
    };

    assert!(matches!(call("unauthorized").await, ForgeError::Authentication(_)));
    match call("limited").await {
        ForgeError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, Some(2000)),
        other => panic!("unexpected error: {other}"),
    }
    match call("broken").await {
        ForgeError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new("k", Some(server.uri()));
    let err = backend
        .complete_chat("gpt-4o", &[], &CompletionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), agentforge::error::ErrorCategory::Backend);
}
