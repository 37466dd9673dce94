//! Content search tool - regex over every visible file in the workspace

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::error::ToolError;
use crate::tools::{parse_params, Tool, ToolContext};

/// Matching lines returned before the output is cut off
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Returned when nothing matched
pub const NO_MATCHES: &str = "No matches found.";

const BINARY_SNIFF_LEN: usize = 512;

fn default_glob() -> String {
    "**/*".to_string()
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    pattern: String,
    #[serde(default = "default_glob")]
    file_glob: String,
}

/// Tool for searching file contents across the workspace
pub struct SearchFiles;

#[async_trait]
impl Tool for SearchFiles {
    fn name(&self) -> &str {
        "search_files"
    }

    fn description(&self) -> &str {
        "Search for a text pattern across files in the workspace. Returns matching lines with file paths and line numbers."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Text or regex pattern to search for (case-insensitive)."
                },
                "file_glob": {
                    "type": "string",
                    "description": "Optional glob pattern to filter files (e.g., '*.py'). Defaults to all files."
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: SearchParams = parse_params(params)?;
        let regex = build_regex(&params.pattern)?;
        let matcher = Glob::new(&params.file_glob)
            .map_err(|e| ToolError::InvalidParams(format!("Invalid glob: {}", e)))?
            .compile_matcher();
        let root = ctx.sandbox.root().to_path_buf();

        tokio::task::spawn_blocking(move || search_tree(&root, &regex, &matcher))
            .await
            .map_err(|e| ToolError::Execution(format!("search task failed: {}", e)))
    }
}

/// Compile `pattern` case-insensitively, falling back to a literal match when
/// it is not a valid regex.
fn build_regex(pattern: &str) -> Result<Regex, ToolError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .or_else(|e| {
            tracing::debug!(pattern, error = %e, "Invalid regex, searching literally");
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
        })
        .map_err(|e| ToolError::InvalidParams(format!("Invalid pattern: {}", e)))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

fn search_tree(root: &Path, regex: &Regex, matcher: &GlobMatcher) -> String {
    let mut results = Vec::new();

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    for entry in files {
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !matcher.is_match(relative) && !matcher.is_match(entry.file_name()) {
            continue;
        }

        // Unreadable and binary files are skipped silently
        let Ok(bytes) = std::fs::read(entry.path()) else {
            continue;
        };
        if is_binary(&bytes) {
            continue;
        }

        let relative = vics_sandbox::path_to_display(relative);
        let text = String::from_utf8_lossy(&bytes);
        for (index, line) in text.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            results.push(format!("{}:{}: {}", relative, index + 1, line.trim()));
            if results.len() >= MAX_SEARCH_RESULTS {
                results.push(format!(
                    "... (truncated at {} matches)",
                    MAX_SEARCH_RESULTS
                ));
                return results.join("\n");
            }
        }
    }

    if results.is_empty() {
        NO_MATCHES.to_string()
    } else {
        results.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_regex_case_insensitive() {
        assert!(build_regex("HELLO").unwrap().is_match("say hello"));
    }

    #[test]
    fn test_build_regex_literal_fallback() {
        let regex = build_regex("foo(").unwrap();
        assert!(regex.is_match("call FOO(bar)"));
        assert!(!regex.is_match("foo bar"));
    }

    #[test]
    fn test_is_binary() {
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b"plain text"));
    }
}
