//! Think tool - a scratchpad for the model with no side effects

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

/// Acknowledgement returned for every thought
pub const THOUGHT_RECORDED: &str = "Thought recorded. Continue with your plan.";

#[derive(Debug, Deserialize)]
struct ThinkParams {
    #[serde(default)]
    thought: Value,
}

pub struct Think;

#[async_trait]
impl Tool for Think {
    fn name(&self) -> &str {
        "think"
    }

    fn description(&self) -> &str {
        "Use this tool to think step-by-step about complex problems, plan your approach, or reason through a difficult decision before acting. Your thought is not shown to the user."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "thought": {
                    "type": "string",
                    "description": "Your step-by-step reasoning."
                }
            },
            "required": ["thought"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<String, ToolError> {
        // Anything at all is accepted; the thought itself is only logged
        let params: ThinkParams = parse_params(params).unwrap_or(ThinkParams { thought: Value::Null });
        tracing::debug!(thought = %params.thought, "Model thought");
        Ok(THOUGHT_RECORDED.to_string())
    }
}
