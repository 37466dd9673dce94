//! List directory tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

/// Returned when a directory has no entries
pub const EMPTY_DIRECTORY: &str = "(empty directory)";

#[derive(Debug, Deserialize)]
struct ListParams {
    path: String,
}

/// Tool for listing directory contents
pub struct ListDirectory;

#[async_trait]
impl Tool for ListDirectory {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List files and directories in a given path. Returns names with '/' suffix for directories."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to the directory within the workspace. Use '.' for root."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: ListParams = parse_params(params)?;
        let target = ctx.sandbox.resolve(&params.path)?;

        let metadata = match tokio::fs::metadata(&target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::NotFound(format!(
                    "Directory not found: {}",
                    params.path
                )));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(ToolError::NotADirectory(params.path));
        }

        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&target).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follows symlinks, so a link to a directory lists as one
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push((name, is_dir));
        }

        if entries.is_empty() {
            return Ok(EMPTY_DIRECTORY.to_string());
        }
        entries.sort();

        let entries: Vec<String> = entries
            .into_iter()
            .map(|(name, is_dir)| if is_dir { format!("{}/", name) } else { name })
            .collect();
        Ok(entries.join("\n"))
    }
}
