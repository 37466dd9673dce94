//! Chat Completions wire format (OpenAI and compatible endpoints)
//!
//! Turns map one-to-one onto role-tagged messages. Tool results travel as
//! `tool` messages correlated by `tool_call_id`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{http_client, post_json, GenerationSettings, LlmProvider};
use crate::error::{Error, Result};
use crate::message::{Role, ToolRequest, Turn};
use crate::tools::ToolDefinition;

/// Build the request body for `POST /chat/completions`.
pub fn build_request(
    settings: &GenerationSettings,
    turns: &[Turn],
    tools: &[ToolDefinition],
) -> Value {
    let messages: Vec<Value> = turns.iter().map(turn_to_message).collect();

    let mut body = json!({
        "model": settings.model,
        "messages": messages,
        "temperature": settings.temperature,
        "max_tokens": settings.max_tokens,
    });

    if !tools.is_empty() {
        let tools: Vec<Value> = tools
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
        body["tools"] = Value::Array(tools);
        body["tool_choice"] = json!("auto");
    }

    body
}

fn turn_to_message(turn: &Turn) -> Value {
    let mut message = Map::new();
    message.insert("role".into(), json!(turn.role.as_str()));

    if turn.role == Role::Assistant && turn.has_tool_requests() {
        // Text may be absent when the model only calls tools
        let content = if turn.text.is_empty() {
            Value::Null
        } else {
            json!(turn.text)
        };
        message.insert("content".into(), content);
        let calls: Vec<Value> = turn
            .tool_requests
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "type": "function",
                    "function": {"name": r.name, "arguments": r.arguments},
                })
            })
            .collect();
        message.insert("tool_calls".into(), Value::Array(calls));
    } else {
        message.insert("content".into(), json!(turn.text));
    }

    if let Some(link) = &turn.tool_result {
        message.insert("tool_call_id".into(), json!(link.request_id));
        message.insert("name".into(), json!(link.tool_name));
    }

    Value::Object(message)
}

/// Parse a Chat Completions response body into an assistant turn.
pub fn parse_response(body: &Value) -> Result<Turn> {
    let message = body
        .pointer("/choices/0/message")
        .ok_or_else(|| Error::Transport("Malformed response: no choices returned".into()))?;

    let text = message["content"].as_str().unwrap_or_default().to_string();

    let mut requests = Vec::new();
    if let Some(calls) = message["tool_calls"].as_array() {
        for call in calls {
            let id = call["id"].as_str().unwrap_or_default();
            let name = call
                .pointer("/function/name")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::Transport("Malformed response: tool call without a name".into()))?;
            // Arguments are normally a JSON string; some compatible servers send an object
            let arguments = match call.pointer("/function/arguments") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            requests.push(ToolRequest::new(id, name, arguments));
        }
    }

    Ok(Turn::assistant_with_tools(text, requests))
}

/// Client for the Chat Completions API
#[derive(Debug, Clone)]
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    settings: GenerationSettings,
}

impl ChatCompletionsProvider {
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
impl LlmProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        "openai"
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
            "Sending chat completions request"
        );

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);
        let response = post_json(request, &body).await?;
        parse_response(&response)
    }
}
