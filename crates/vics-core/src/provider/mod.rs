//! LLM provider abstraction
//!
//! Two wire protocols are supported:
//! - Chat Completions (OpenAI and compatible endpoints)
//! - Messages (Anthropic)
//!
//! Both translate the provider-neutral [`Turn`] history into their own
//! request shape and translate the response back into an assistant turn.
//! The agent loop only ever sees [`LlmProvider`].

pub mod chat_completions;
pub mod factory;
pub mod logging;
pub mod messages;

pub use chat_completions::ChatCompletionsProvider;
pub use factory::create_provider;
pub use messages::MessagesProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::message::Turn;
use crate::tools::ToolDefinition;

/// Upper bound on a single provider round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest slice of an error body carried into a transport error
const ERROR_BODY_EXCERPT: usize = 500;

/// Supported provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI Chat Completions
    #[default]
    OpenAI,
    /// Anthropic Messages
    #[serde(alias = "claude")]
    Anthropic,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Get the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o",
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    /// Get the environment variable name for API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Environment variable that overrides the model
    pub fn model_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_MODEL",
            ProviderKind::Anthropic => "ANTHROPIC_MODEL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A model backend that produces the next assistant turn
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "anthropic")
    fn name(&self) -> &str;

    /// Model requests are sent to
    fn model(&self) -> &str;

    /// Send the conversation and advertised tools, returning the assistant turn.
    async fn send(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<Turn>;
}

/// The closed set of provider adapters, chosen once at construction
#[derive(Debug, Clone)]
pub enum Provider {
    ChatCompletions(ChatCompletionsProvider),
    Messages(MessagesProvider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::ChatCompletions(_) => ProviderKind::OpenAI,
            Provider::Messages(_) => ProviderKind::Anthropic,
        }
    }
}

#[async_trait]
impl LlmProvider for Provider {
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn model(&self) -> &str {
        match self {
            Provider::ChatCompletions(p) => p.model(),
            Provider::Messages(p) => p.model(),
        }
    }

    async fn send(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<Turn> {
        let result = match self {
            Provider::ChatCompletions(p) => p.send(turns, tools).await,
            Provider::Messages(p) => p.send(turns, tools).await,
        };

        logging::log_exchange(logging::Exchange {
            provider: self.name(),
            model: self.model(),
            turns,
            tools,
            result: &result,
        });

        if let Err(e) = &result {
            tracing::error!(provider = self.name(), error = %e, "Provider request failed");
        }
        result
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Send a prepared request and return the parsed JSON body.
///
/// Connection failures, non-success statuses and unparseable bodies all
/// become [`Error::Transport`].
pub(crate) async fn post_json(request: reqwest::RequestBuilder, body: &Value) -> Result<Value> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("Request failed: {}", e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        return Err(Error::Transport(format!(
            "API error ({}): {}",
            status,
            excerpt(&text, ERROR_BODY_EXCERPT)
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        Error::Transport(format!(
            "Failed to parse response: {}: {}",
            e,
            excerpt(&text, ERROR_BODY_EXCERPT)
        ))
    })
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
