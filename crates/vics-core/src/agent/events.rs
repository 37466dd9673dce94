//! Progress events emitted by the agent loop
//!
//! The loop writes to an [`EventSink`] and never reads anything back, so
//! display code stays outside the core.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A new Thinking cycle is about to call the provider
    IterationStarted { iteration: usize, max_iterations: usize },
    /// Text the model emitted alongside tool requests
    AssistantText { text: String },
    ToolStarted {
        id: String,
        name: String,
        arguments: Value,
        /// `key=value` summary with long values shortened
        summary: String,
    },
    ToolFinished {
        id: String,
        name: String,
        /// Result text, truncated for display
        result: String,
    },
    /// The model answered without requesting tools
    Finished { text: String, iterations: usize },
    /// The ceiling was hit before a final answer
    IterationLimitReached { max_iterations: usize, message: String },
}

/// Receiver for agent progress
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &AgentEvent);
}

/// Default sink: forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &AgentEvent) {
        match event {
            AgentEvent::IterationStarted { iteration, max_iterations } => {
                tracing::debug!(iteration, max_iterations, "Iteration started");
            }
            AgentEvent::AssistantText { text } => {
                tracing::info!(text = %text, "Assistant");
            }
            AgentEvent::ToolStarted { name, summary, .. } => {
                tracing::info!("⚡ {}({})", name, summary);
            }
            AgentEvent::ToolFinished { name, result, .. } => {
                tracing::info!(tool = %name, "→ {}", result);
            }
            AgentEvent::Finished { iterations, .. } => {
                tracing::info!(iterations, "Agent finished");
            }
            AgentEvent::IterationLimitReached { max_iterations, .. } => {
                tracing::warn!(max_iterations, "Reached maximum iterations");
            }
        }
    }
}
