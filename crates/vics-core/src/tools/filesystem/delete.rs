//! Delete file tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

#[derive(Debug, Deserialize)]
struct DeleteParams {
    path: String,
}

/// Tool for deleting a single file. Directories are refused.
pub struct DeleteFile;

#[async_trait]
impl Tool for DeleteFile {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file from the workspace."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to the file to delete."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: DeleteParams = parse_params(params)?;
        let target = ctx.sandbox.resolve(&params.path)?;

        let metadata = match tokio::fs::metadata(&target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::NotFound(format!("File not found: {}", params.path)));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            return Err(ToolError::IsADirectory(params.path));
        }

        tokio::fs::remove_file(&target).await?;
        Ok(format!("Deleted {}", params.path))
    }
}
