//! Run command tool

use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer};
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

/// Timeout applied when the model does not pass one
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;

#[derive(Debug, Deserialize)]
struct RunCommandParams {
    command: String,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    timeout: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(f64),
    Text(String),
}

/// Models send the timeout as an integer, a float or a numeric string
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid timeout: {:?}", text))),
    }
}

/// Tool for executing shell commands in the workspace
pub struct RunCommand;

#[async_trait]
impl Tool for RunCommand {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command in the workspace directory. Returns stdout, stderr and the exit code. Use for running scripts, installing packages, git operations, etc."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in seconds (default: 60)",
                    "default": 60
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: RunCommandParams = parse_params(params)?;

        // Blocked commands never reach a subprocess
        ctx.policy.check(&params.command)?;

        let seconds = params.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::try_from_secs_f64(seconds)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| ToolError::InvalidParams(format!("invalid timeout: {}", seconds)))?;

        tracing::debug!(command = %params.command, ?timeout, "Running shell command");
        let output = vics_sandbox::run_shell(ctx.sandbox.root(), &params.command, timeout).await?;
        Ok(output.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout_of(params: Value) -> Option<f64> {
        parse_params::<RunCommandParams>(params).unwrap().timeout
    }

    #[test]
    fn test_timeout_accepts_numbers_and_strings() {
        assert_eq!(timeout_of(json!({"command": "ls", "timeout": 5})), Some(5.0));
        assert_eq!(timeout_of(json!({"command": "ls", "timeout": 2.5})), Some(2.5));
        assert_eq!(timeout_of(json!({"command": "ls", "timeout": " 30 "})), Some(30.0));
        assert_eq!(timeout_of(json!({"command": "ls", "timeout": null})), None);
        assert_eq!(timeout_of(json!({"command": "ls"})), None);
    }

    #[test]
    fn test_timeout_rejects_garbage() {
        let err = parse_params::<RunCommandParams>(json!({"command": "ls", "timeout": "soon"}))
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParams");
    }
}
