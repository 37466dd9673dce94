//! Error types for Vics Core

use thiserror::Error;
use vics_sandbox::SandboxError;

/// Result type alias using Vics Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that cross the agent loop boundary
#[derive(Error, Debug)]
pub enum Error {
    /// Network, auth or protocol failure talking to the model provider
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tool-specific errors
///
/// Every variant is rendered to text by the tool executor; none of them reach
/// the agent loop as a fault.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Access denied: {0} escapes the workspace.")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("{0} is a directory. Use run_command to remove directories.")]
    IsADirectory(String),

    #[error("old_string found {count} times in {path}; it must be unique. Add more context.")]
    Ambiguous { path: String, count: usize },

    #[error("Command blocked for safety: matches '{0}'")]
    Blocked(String),

    #[error("Command timed out after {0}s.")]
    Timeout(f64),

    #[error("{0}")]
    InvalidParams(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    /// Short name of the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "AccessDenied",
            Self::NotFound(_) => "NotFound",
            Self::NotADirectory(_) => "NotADirectory",
            Self::IsADirectory(_) => "IsADirectory",
            Self::Ambiguous { .. } => "Ambiguous",
            Self::Blocked(_) => "Blocked",
            Self::Timeout(_) => "Timeout",
            Self::InvalidParams(_) => "InvalidParams",
            Self::Io(e) => io_kind_name(e.kind()),
            Self::Execution(_) => "ExecutionFault",
        }
    }

    /// Whether this is an anticipated outcome the tool reports deliberately,
    /// as opposed to a fault that escaped the tool's own handling.
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            Self::InvalidParams(_) | Self::Io(_) | Self::Execution(_)
        )
    }

    /// Text handed back to the model in place of a tool result
    pub fn render(&self, tool_name: &str) -> String {
        if self.is_expected() {
            format!("Error: {}", self)
        } else {
            format!("Error executing {}: {}: {}", tool_name, self.kind(), self)
        }
    }
}

impl From<SandboxError> for ToolError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::AccessDenied { path } => Self::AccessDenied(path),
            SandboxError::Blocked { pattern } => Self::Blocked(pattern),
            SandboxError::Timeout { seconds } => Self::Timeout(seconds),
            SandboxError::Io(e) => Self::Io(e),
            other => Self::Execution(other.to_string()),
        }
    }
}

fn io_kind_name(kind: std::io::ErrorKind) -> &'static str {
    use std::io::ErrorKind;
    match kind {
        ErrorKind::NotFound => "FileNotFoundError",
        ErrorKind::PermissionDenied => "PermissionError",
        ErrorKind::AlreadyExists => "FileExistsError",
        ErrorKind::InvalidData => "InvalidDataError",
        ErrorKind::TimedOut => "TimeoutError",
        _ => "IoError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_errors_render_plainly() {
        let err = ToolError::NotFound("File not found: a.txt".into());
        assert_eq!(err.render("read_file"), "Error: File not found: a.txt");

        let err = ToolError::Ambiguous { path: "a.txt".into(), count: 3 };
        assert_eq!(
            err.render("edit_file"),
            "Error: old_string found 3 times in a.txt; it must be unique. Add more context."
        );
    }

    #[test]
    fn test_faults_render_with_kind() {
        let err = ToolError::InvalidParams("missing field `path`".into());
        assert_eq!(
            err.render("read_file"),
            "Error executing read_file: InvalidParams: missing field `path`"
        );

        let err = ToolError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"));
        assert_eq!(err.render("write_file"), "Error executing write_file: PermissionError: nope");
    }

    #[test]
    fn test_from_sandbox_error() {
        let err: ToolError = SandboxError::AccessDenied { path: "../x".into() }.into();
        assert_eq!(err.render("read_file"), "Error: Access denied: ../x escapes the workspace.");

        let err: ToolError = SandboxError::Timeout { seconds: 1.0 }.into();
        assert_eq!(err.render("run_command"), "Error: Command timed out after 1s.");
    }
}
