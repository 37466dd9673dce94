//! Read file tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

#[derive(Debug, Deserialize)]
struct ReadParams {
    path: String,
}

/// Tool for reading file contents
pub struct ReadFile;

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file. Returns the full text content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to the file within the workspace."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: ReadParams = parse_params(params)?;
        let target = ctx.sandbox.resolve(&params.path)?;

        if !tokio::fs::try_exists(&target).await? {
            return Err(ToolError::NotFound(format!("File not found: {}", params.path)));
        }

        // Invalid UTF-8 is replaced rather than rejected
        let bytes = tokio::fs::read(&target).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
