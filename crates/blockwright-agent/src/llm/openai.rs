//! OpenAI-compatible API implementation.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::types::{safe_truncate, ChatMessage, ToolDefinition};

use super::{ChatCompletionResponse, LlmClient};

impl LlmClient {
    /// Request body. `tool_choice` is only set when tools are offered.
    pub(super) fn request_body(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Value> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = serde_json::to_value(tools)?;
                body["tool_choice"] = json!("auto");
            }
        }

        Ok(body)
    }

    pub(super) async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.request_body(messages, tools)?;

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            with_tools = tools.is_some_and(|t| !t.is_empty()),
            "LLM request"
        );

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("LLM API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, safe_truncate(&body_text, 2000));
        }

        let response: ChatCompletionResponse = resp
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        Ok(response)
    }
}
