//! Messages wire format (Anthropic)
//!
//! This protocol has no tool role. System text moves to a top-level field,
//! assistant tool requests become `tool_use` blocks, and tool results are sent
//! back as `tool_result` blocks inside a user message.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{http_client, post_json, GenerationSettings, LlmProvider};
use crate::error::{Error, Result};
use crate::message::{Role, ToolRequest, Turn};
use crate::tools::ToolDefinition;

pub const API_VERSION: &str = "2023-06-01";

/// Build the request body for `POST /messages`.
pub fn build_request(
    settings: &GenerationSettings,
    turns: &[Turn],
    tools: &[ToolDefinition],
) -> Value {
    let system: Vec<&str> = turns
        .iter()
        .filter(|t| t.role == Role::System && !t.text.is_empty())
        .map(|t| t.text.as_str())
        .collect();

    let mut messages: Vec<Value> = Vec::new();
    for turn in turns {
        match turn.role {
            Role::System => {}
            Role::Tool => push_tool_result(&mut messages, turn),
            Role::Assistant if turn.has_tool_requests() => {
                let mut blocks = Vec::new();
                if !turn.text.is_empty() {
                    blocks.push(json!({"type": "text", "text": turn.text}));
                }
                for request in &turn.tool_requests {
                    blocks.push(json!({
                        "type": "tool_use",
                        "id": request.id,
                        "name": request.name,
                        "input": parse_input(&request.arguments),
                    }));
                }
                messages.push(json!({"role": "assistant", "content": blocks}));
            }
            // Empty content is rejected outside the final position
            Role::Assistant if turn.text.is_empty() => {}
            Role::User | Role::Assistant => {
                messages.push(json!({"role": turn.role.as_str(), "content": turn.text}));
            }
        }
    }

    let mut body = json!({
        "model": settings.model,
        "max_tokens": settings.max_tokens,
        "temperature": settings.temperature,
        "messages": messages,
    });

    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }

    if !tools.is_empty() {
        let tools: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "input_schema": t.parameters,
                })
            })
            .collect();
        body["tools"] = Value::Array(tools);
    }

    body
}

/// Append a tool result, merging into the previous message when it already
/// carries tool results. Consecutive results must share one user message.
fn push_tool_result(messages: &mut Vec<Value>, turn: &Turn) {
    let tool_use_id = turn
        .tool_result
        .as_ref()
        .map(|link| link.request_id.as_str())
        .unwrap_or_default();
    let block = json!({
        "type": "tool_result",
        "tool_use_id": tool_use_id,
        "content": turn.text,
    });

    if let Some(last) = messages.last_mut()
        && last["role"] == "user"
        && let Some(blocks) = last["content"].as_array_mut()
        && blocks.iter().all(|b| b["type"] == "tool_result")
    {
        blocks.push(block);
        return;
    }
    messages.push(json!({"role": "user", "content": [block]}));
}

/// Argument text as a JSON object; anything else becomes `{}`
fn parse_input(arguments: &str) -> Value {
    match serde_json::from_str::<Value>(arguments) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

/// Parse a Messages response body into an assistant turn.
pub fn parse_response(body: &Value) -> Result<Turn> {
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| Error::Transport("Malformed response: missing content".into()))?;

    let mut text_parts = Vec::new();
    let mut requests = Vec::new();
    for block in blocks {
        match block["type"].as_str() {
            Some("text") => {
                if let Some(text) = block["text"].as_str() {
                    text_parts.push(text);
                }
            }
            Some("tool_use") => {
                let name = block["name"].as_str().ok_or_else(|| {
                    Error::Transport("Malformed response: tool_use without a name".into())
                })?;
                let id = block["id"].as_str().unwrap_or_default();
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));
                requests.push(ToolRequest::new(id, name, input.to_string()));
            }
            other => {
                tracing::debug!(block_type = ?other, "Ignoring content block");
            }
        }
    }

    Ok(Turn::assistant_with_tools(text_parts.join("\n"), requests))
}

/// Client for the Messages API
#[derive(Debug, Clone)]
pub struct MessagesProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    settings: GenerationSettings,
}

impl MessagesProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        settings: GenerationSettings,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
        })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmProvider for MessagesProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn send(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<Turn> {
        let body = build_request(&self.settings, turns, tools);
        tracing::debug!(
            model = %self.settings.model,
            turns = turns.len(),
            tools = tools.len(),
            "Sending messages request"
        );

        let request = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);
        let response = post_json(request, &body).await?;
        parse_response(&response)
    }
}
