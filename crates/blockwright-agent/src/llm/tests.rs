//! Tests for the LLM client.

use std::time::Duration;

use super::*;
use crate::types::{ChatMessage, ToolCall};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config(api_base: &str, temperature: Option<f64>) -> LlmConfig {
    LlmConfig {
        api_base: api_base.to_string(),
        api_key: "sk-test".to_string(),
        model: "kimi-k2".to_string(),
        temperature,
        timeout: Duration::from_secs(5),
        error_backoff: Duration::from_millis(1),
    }
}

fn tool() -> ToolDefinition {
    ToolDefinition::function(
        "get_world_state",
        "Get the world state",
        json!({"type": "object", "properties": {}}),
    )
}

#[test]
fn test_request_body_with_tools() {
    let client = LlmClient::new(&config("http://localhost", Some(1.0))).unwrap();
    let tools = vec![tool()];
    let body = client
        .request_body(&[ChatMessage::user("hello")], Some(&tools))
        .unwrap();
    assert_eq!(body["model"], "kimi-k2");
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(body["tools"][0]["function"]["name"], "get_world_state");
    assert_eq!(body["messages"][0], json!({"role": "user", "content": "hello"}));
}

#[test]
fn test_request_body_without_tools() {
    let client = LlmClient::new(&config("http://localhost", None)).unwrap();
    let body = client.request_body(&[ChatMessage::user("hi")], None).unwrap();
    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
    assert!(body.get("temperature").is_none());

    let body = client.request_body(&[ChatMessage::user("hi")], Some(&[])).unwrap();
    assert!(body.get("tool_choice").is_none());
}

#[test]
fn test_context_overflow_detection() {
    assert!(is_context_overflow_error(
        "LLM API error (400 Bad Request): {\"error\":{\"code\":\"context_length_exceeded\"}}"
    ));
    assert!(is_context_overflow_error("This model's maximum context length is 128000 tokens"));
    assert!(!is_context_overflow_error("LLM API error (429): rate limited"));
}

#[test]
fn test_model_reply_text_content() {
    assert_eq!(ModelReply::text("  plan  ").text_content(), Some("plan"));
    assert_eq!(ModelReply::text("   ").text_content(), None);
    assert!(!ModelReply::default().has_tool_calls());
}

#[tokio::test]
async fn test_complete_parses_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "kimi-k2", "tool_choice": "auto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "model": "kimi-k2",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": "Let me look around.",
                    "tool_calls": [
                        {"id": "call_1", "type": "function",
                         "function": {"name": "get_world_state", "arguments": "{}"}},
                        {"id": "call_2", "type": "function",
                         "function": {"name": "remove_block", "arguments": "{\"x\":0,\"y\":0,\"z\":0}"}}
                    ]
                }
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(&config(&format!("{}/v1/", server.uri()), None)).unwrap();
    let tools = vec![tool()];
    let reply = client
        .complete(&[ChatMessage::user("go")], Some(&tools))
        .await
        .unwrap();
    assert_eq!(reply.text_content(), Some("Let me look around."));
    let ids: Vec<&str> = reply.tool_calls.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["call_1", "call_2"]);
    assert_eq!(
        reply.tool_calls[1],
        ToolCall::new("call_2", "remove_block", "{\"x\":0,\"y\":0,\"z\":0}")
    );
}

#[tokio::test]
async fn test_summary_call_sends_no_tools() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(|req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            let text = if body.get("tools").is_none() && body.get("tool_choice").is_none() {
                "no tools"
            } else {
                "tools present"
            };
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": text}}]
            }))
        })
        .mount(&server)
        .await;

    let client = LlmClient::new(&config(&server.uri(), None)).unwrap();
    let reply = client.complete(&[ChatMessage::user("sum up")], None).await.unwrap();
    assert_eq!(reply.content.as_deref(), Some("no tools"));
    assert!(reply.tool_calls.is_empty());
}

#[tokio::test]
async fn test_error_status_surfaces_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("{\"error\":{\"code\":\"context_length_exceeded\"}}"),
        )
        .mount(&server)
        .await;

    let client = LlmClient::new(&config(&server.uri(), None)).unwrap();
    let err = client.complete(&[ChatMessage::user("x")], None).await.unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("400"));
    assert!(is_context_overflow_error(&msg));
}

#[tokio::test]
async fn test_empty_choices_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = LlmClient::new(&config(&server.uri(), None)).unwrap();
    assert!(client.complete(&[ChatMessage::user("x")], None).await.is_err());
}
