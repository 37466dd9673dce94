//! Provider exchange logging
//!
//! Set the `VICS_LLM_LOG_FILE` environment variable to append one JSON line
//! per provider request, including the parsed response or the error.
//!
//! Example: `VICS_LLM_LOG_FILE=/tmp/llm.log vics ask "list files"`

use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::message::Turn;
use crate::tools::ToolDefinition;

pub const LOG_FILE_ENV: &str = "VICS_LLM_LOG_FILE";

/// One provider round trip
pub struct Exchange<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub turns: &'a [Turn],
    pub tools: &'a [ToolDefinition],
    pub result: &'a Result<Turn>,
}

impl Exchange<'_> {
    pub fn to_json(&self) -> Value {
        let (response, error) = match self.result {
            Ok(turn) => (
                json!({
                    "type": if turn.has_tool_requests() { "tool_calls" } else { "message" },
                    "content": turn.text,
                    "tool_calls": turn.tool_requests.iter().map(|r| json!({
                        "id": r.id,
                        "name": r.name,
                        "arguments": r.arguments,
                    })).collect::<Vec<_>>(),
                }),
                None,
            ),
            Err(e) => (Value::Null, Some(e.to_string())),
        };

        json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "provider": self.provider,
            "model": self.model,
            "request": {
                "turn_count": self.turns.len(),
                "tool_count": self.tools.len(),
                "last_turn": self.turns.last().map(|t| json!({
                    "role": t.role.as_str(),
                    "content": t.text,
                })),
            },
            "response": response,
            "error": error,
        })
    }
}

/// Log an exchange if `VICS_LLM_LOG_FILE` is set.
pub fn log_exchange(exchange: Exchange<'_>) {
    if let Ok(path) = std::env::var(LOG_FILE_ENV)
        && !path.is_empty()
    {
        append_entry(Path::new(&path), &exchange.to_json());
    }
}

/// Append `entry` as a single JSON line. Failures are only warned about.
pub fn append_entry(path: &Path, entry: &Value) {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path);

    match file {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", entry) {
                warn!("Failed to write to LLM log file: {}", e);
            } else {
                debug!("Logged provider exchange to {}", path.display());
            }
        }
        Err(e) => {
            warn!("Failed to open LLM log file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::message::ToolRequest;

    #[test]
    fn test_exchange_json_for_tool_calls() {
        let turns = vec![Turn::system("s"), Turn::user("list files")];
        let result = Ok(Turn::assistant_with_tools(
            "",
            vec![ToolRequest::new("c1", "list_directory", r#"{"path":"."}"#)],
        ));
        let entry = Exchange {
            provider: "openai",
            model: "gpt-4o",
            turns: &turns,
            tools: &[],
            result: &result,
        }
        .to_json();

        assert_eq!(entry["request"]["turn_count"], 2);
        assert_eq!(entry["request"]["last_turn"]["content"], "list files");
        assert_eq!(entry["response"]["type"], "tool_calls");
        assert_eq!(entry["response"]["tool_calls"][0]["name"], "list_directory");
        assert!(entry["error"].is_null());
    }

    #[test]
    fn test_exchange_json_for_error() {
        let result = Err(Error::Transport("boom".into()));
        let entry = Exchange {
            provider: "anthropic",
            model: "m",
            turns: &[],
            tools: &[],
            result: &result,
        }
        .to_json();
        assert!(entry["response"].is_null());
        assert_eq!(entry["error"], "Transport error: boom");
    }

    #[test]
    fn test_append_entry_writes_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("llm.log");
        append_entry(&path, &json!({"n": 1}));
        append_entry(&path, &json!({"n": 2}));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![r#"{"n":1}"#, r#"{"n":2}"#]);
    }
}
