//! Edit file tool - surgical string replacement

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

#[derive(Debug, Deserialize)]
struct EditParams {
    path: String,
    old_string: String,
    new_string: String,
}

/// Tool for replacing exactly one occurrence of a string in a file
pub struct EditFile;

#[async_trait]
impl Tool for EditFile {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Replace an exact string in a file with a new string. Use this for targeted edits. \
         The edit fails if old_string is missing or appears more than once."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to the file within the workspace."
                },
                "old_string": {
                    "type": "string",
                    "description": "The exact text to find and replace (must match exactly)."
                },
                "new_string": {
                    "type": "string",
                    "description": "The replacement text."
                }
            },
            "required": ["path", "old_string", "new_string"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: EditParams = parse_params(params)?;
        let target = ctx.sandbox.resolve(&params.path)?;

        if !tokio::fs::try_exists(&target).await? {
            return Err(ToolError::NotFound(format!("File not found: {}", params.path)));
        }

        let content = tokio::fs::read_to_string(&target).await?;

        // An empty needle would "match" between every character
        let occurrences = if params.old_string.is_empty() {
            0
        } else {
            content.matches(params.old_string.as_str()).count()
        };

        match occurrences {
            0 => Err(ToolError::NotFound(format!(
                "old_string not found in {}.",
                params.path
            ))),
            1 => {
                let updated = content.replacen(&params.old_string, &params.new_string, 1);
                tokio::fs::write(&target, updated).await?;
                Ok(format!("Successfully edited {}", params.path))
            }
            count => Err(ToolError::Ambiguous {
                path: params.path,
                count,
            }),
        }
    }
}
