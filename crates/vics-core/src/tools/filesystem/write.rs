//! Write file tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

#[derive(Debug, Deserialize)]
struct WriteParams {
    path: String,
    content: String,
}

/// Tool for writing file contents, creating parent directories as needed
pub struct WriteFile;

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file. Creates the file and parent directories if they don't exist. Overwrites existing content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to the file within the workspace."
                },
                "content": {
                    "type": "string",
                    "description": "The full content to write to the file."
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: WriteParams = parse_params(params)?;
        let target = ctx.sandbox.resolve(&params.path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, params.content.as_bytes()).await?;

        Ok(format!(
            "Successfully wrote {} bytes to {}",
            params.content.len(),
            params.path
        ))
    }
}
