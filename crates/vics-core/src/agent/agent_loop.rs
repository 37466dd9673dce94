//! The agent loop
//!
//! `Idle -> Thinking -> (ExecutingTools -> Thinking)* -> Done`
//!
//! Each Thinking entry sends the full conversation to the provider. Tool
//! requests are executed one at a time, in the order the model issued them,
//! and every result is appended before the next Thinking entry.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::conversation::Conversation;
use super::events::{AgentEvent, EventSink, TracingSink};
use crate::error::Result;
use crate::formatting::{summarize_arguments, truncate_result, RESULT_DISPLAY_LEN};
use crate::message::Turn;
use crate::provider::LlmProvider;
use crate::tools::ToolExecutor;

/// Returned when the ceiling is hit before a final answer
pub const MAX_ITERATIONS_MESSAGE: &str =
    "Reached maximum iterations. Here's what I accomplished so far.";

pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Where the loop is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Thinking,
    ExecutingTools,
    Done,
}

pub struct AgentLoop<P: LlmProvider> {
    provider: P,
    executor: ToolExecutor,
    conversation: Conversation,
    max_iterations: usize,
    state: LoopState,
    sink: Arc<dyn EventSink>,
}

impl<P: LlmProvider> AgentLoop<P> {
    pub fn new(provider: P, executor: ToolExecutor, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            executor,
            conversation: Conversation::new(system_prompt),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            state: LoopState::Idle,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run one user request to completion.
    ///
    /// Returns the final assistant text, or [`MAX_ITERATIONS_MESSAGE`] when
    /// the ceiling is reached. Provider failures propagate; turns appended
    /// before the failure are kept and the loop returns to `Idle`.
    pub async fn run(&mut self, user_text: &str) -> Result<String> {
        info!(conversation = %self.conversation.id(), "Starting agent run");
        self.conversation.push(Turn::user(user_text));
        let tools = self.executor.definitions();

        for iteration in 1..=self.max_iterations {
            self.state = LoopState::Thinking;
            self.sink.emit(&AgentEvent::IterationStarted {
                iteration,
                max_iterations: self.max_iterations,
            });

            let turn = match self.provider.send(self.conversation.turns(), &tools).await {
                Ok(turn) => turn,
                Err(e) => {
                    self.state = LoopState::Idle;
                    return Err(e);
                }
            };

            if !turn.has_tool_requests() {
                let text = turn.text.clone();
                self.conversation.push(turn);
                self.state = LoopState::Done;
                info!(iterations = iteration, "Agent produced final answer");
                self.sink.emit(&AgentEvent::Finished {
                    text: text.clone(),
                    iterations: iteration,
                });
                return Ok(text);
            }

            if !turn.text.is_empty() {
                self.sink.emit(&AgentEvent::AssistantText {
                    text: turn.text.clone(),
                });
            }

            let requests = turn.tool_requests.clone();
            self.conversation.push(turn);
            self.state = LoopState::ExecutingTools;

            for request in &requests {
                let arguments = parse_arguments(&request.name, &request.arguments);
                self.sink.emit(&AgentEvent::ToolStarted {
                    id: request.id.clone(),
                    name: request.name.clone(),
                    summary: summarize_arguments(&arguments),
                    arguments: arguments.clone(),
                });

                let result = self.executor.execute(&request.name, arguments).await;

                self.sink.emit(&AgentEvent::ToolFinished {
                    id: request.id.clone(),
                    name: request.name.clone(),
                    result: truncate_result(&result, RESULT_DISPLAY_LEN),
                });
                self.conversation.push(Turn::tool_result(request, result));
            }
            debug!(iteration, tools = requests.len(), "Tool batch complete");
        }

        self.state = LoopState::Done;
        warn!(max_iterations = self.max_iterations, "Agent hit iteration ceiling");
        self.sink.emit(&AgentEvent::IterationLimitReached {
            max_iterations: self.max_iterations,
            message: MAX_ITERATIONS_MESSAGE.to_string(),
        });
        Ok(MAX_ITERATIONS_MESSAGE.to_string())
    }

    /// Drop everything but the system turn and return to `Idle`.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.state = LoopState::Idle;
        debug!(conversation = %self.conversation.id(), "Conversation reset");
    }
}

/// Decode tool-call argument text into an object.
///
/// Empty text is an empty argument set. Malformed or non-object payloads are
/// also treated as empty, so the tool reports the problem to the model.
pub fn parse_arguments(tool_name: &str, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            warn!(tool = tool_name, arguments = %other, "Tool arguments are not an object");
            Value::Object(Map::new())
        }
        Err(e) => {
            warn!(tool = tool_name, error = %e, "Malformed tool arguments");
            Value::Object(Map::new())
        }
    }
}
