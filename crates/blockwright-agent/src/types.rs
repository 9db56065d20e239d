//! Shared types for the agent: chat messages, tool wire types, event sinks,
//! and session results.

use serde::{Deserialize, Serialize};

/// Truncate a string at a safe UTF-8 char boundary (from the start).
/// Returns a &str of at most `max_bytes` bytes, never splitting a multi-byte character.
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ─── Messages ───────────────────────────────────────────────────────────────

/// One entry of the conversation, in OpenAI chat-completions shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant_with_tool_calls(content: Option<&str>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.map(|s| s.to_string()),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(result.content.clone()),
            tool_calls: None,
            tool_call_id: Some(result.tool_call_id.clone()),
            name: Some(result.tool_name.clone()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// A tool call from the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(id: &str, name: &str, arguments: &str) -> Self {
        Self {
            id: id.to_string(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }
}

/// Function call details. `arguments` is raw JSON text as the model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Tool catalog entry sent with each model request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn function(name: &str, description: &str, parameters: serde_json::Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// Outcome of one tool call. `content` is always JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub content: String,
    pub is_error: bool,
}

// ─── Session results ────────────────────────────────────────────────────────

/// Counters kept across a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Model turns attempted, including failed ones.
    pub turns: usize,
    pub tool_calls: usize,
    pub failed_tool_calls: usize,
    pub nudges: usize,
    pub model_errors: usize,
    /// Times the conversation was truncated back to the seed message.
    pub resets: usize,
}

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Cancelled,
    MaxTurns,
    /// The model answered without tools and the policy is to stop.
    NoToolCalls,
    /// Tool-turn budget spent with the stop policy.
    ToolTurnBudget,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub reason: TerminationReason,
    pub stats: SessionStats,
    /// Last assistant text seen, if any.
    pub final_response: Option<String>,
}

// ─── Event sink ─────────────────────────────────────────────────────────────

/// Receives progress events from the loop. Display only: nothing here can
/// change what the agent does.
pub trait EventSink: Send {
    /// Called at the start of each turn, before any other event.
    fn on_turn_start(&mut self, _turn: usize) {}
    /// Assistant text (tool-call preamble, plain answer, or turn summary).
    fn on_text(&mut self, text: &str);
    fn on_tool_call(&mut self, name: &str, arguments: &str);
    fn on_tool_result(&mut self, name: &str, result: &str, is_error: bool);
    /// The keep-alive nudge was appended.
    fn on_nudge(&mut self, _text: &str) {}
    /// History was truncated back to the seed message.
    fn on_reset(&mut self) {}
}

/// Separator for CLI section headers.
const SECTION_SEP: &str = "──────────────────────────────────────";

/// Terminal event sink: activity on stderr, model text on stdout.
pub struct TerminalEventSink {
    pub verbose: bool,
}

impl TerminalEventSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl EventSink for TerminalEventSink {
    fn on_turn_start(&mut self, turn: usize) {
        eprintln!("─── turn {} {}", turn, SECTION_SEP);
    }

    fn on_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        use std::io::Write;
        println!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn on_tool_call(&mut self, name: &str, arguments: &str) {
        if self.verbose {
            let args_display = if arguments.len() > 200 {
                format!("{}…", safe_truncate(arguments, 200))
            } else {
                arguments.to_string()
            };
            eprintln!("🔧 {} {}", name, args_display);
        } else {
            eprintln!("🔧 {}", name);
        }
    }

    fn on_tool_result(&mut self, name: &str, result: &str, is_error: bool) {
        let icon = if is_error { "❌" } else { "✅" };
        if self.verbose || is_error {
            let brief = if result.len() > 300 {
                format!("{}…", safe_truncate(result, 300))
            } else {
                result.to_string()
            };
            eprintln!("  {} {}: {}", icon, name, brief);
        } else {
            eprintln!("  {} {}", icon, name);
        }
    }

    fn on_nudge(&mut self, text: &str) {
        if self.verbose {
            eprintln!("💬 {}", text);
        }
    }

    fn on_reset(&mut self) {
        eprintln!("↺ conversation reset to seed");
    }
}

/// Sink that drops everything.
pub struct SilentEventSink;

impl EventSink for SilentEventSink {
    fn on_text(&mut self, _text: &str) {}
    fn on_tool_call(&mut self, _name: &str, _arguments: &str) {}
    fn on_tool_result(&mut self, _name: &str, _result: &str, _is_error: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_truncate_respects_char_boundary() {
        assert_eq!(safe_truncate("héllo", 2), "h");
        assert_eq!(safe_truncate("abc", 10), "abc");
    }

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let v = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(v, json!({"role": "user", "content": "hi"}));

        let call = ToolCall::new("call_1", "remove_block", r#"{"x":0,"y":0,"z":0}"#);
        let v = serde_json::to_value(ChatMessage::assistant_with_tool_calls(None, vec![call])).unwrap();
        assert_eq!(v["role"], "assistant");
        assert!(v.get("content").is_none());
        assert_eq!(v["tool_calls"][0]["type"], "function");
        assert_eq!(v["tool_calls"][0]["function"]["name"], "remove_block");
    }

    #[test]
    fn test_tool_result_message() {
        let result = ToolResult {
            tool_call_id: "call_9".to_string(),
            tool_name: "view_declarations".to_string(),
            content: "{}".to_string(),
            is_error: false,
        };
        let msg = ChatMessage::tool_result(&result);
        assert_eq!(msg.role, "tool");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(msg.name.as_deref(), Some("view_declarations"));
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_tool_call_type_defaults_to_function() {
        let call: ToolCall =
            serde_json::from_value(json!({"id": "a", "function": {"name": "get_world_state"}}))
                .unwrap();
        assert_eq!(call.call_type, "function");
        assert_eq!(call.function.arguments, "");
    }
}
