//! Vics Sandbox - Workspace confinement for agent tools
//!
//! This crate keeps every filesystem and shell capability inside a single
//! workspace root:
//! - Path resolution that rejects `..` traversal, absolute overrides and
//!   symlink escapes
//! - A denylist policy for destructive shell commands
//! - Shell execution bounded by a timeout

pub mod path;
pub mod policy;
pub mod process;

use std::path::{Path, PathBuf};

pub use path::{normalize_path, path_to_display};
pub use policy::CommandPolicy;
pub use process::{run_shell, CommandOutput};

/// Sandbox errors
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Access denied: {path} escapes the workspace")]
    AccessDenied { path: String },
    #[error("Command blocked for safety: matches '{pattern}'")]
    Blocked { pattern: String },
    #[error("Command timed out after {seconds}s")]
    Timeout { seconds: f64 },
    #[error("Workspace root is not a directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of checking a caller-supplied path against the sandbox root.
///
/// Computed per call and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPath {
    /// Fully resolved absolute target
    pub target: PathBuf,
    /// Whether `target` is the root itself or one of its descendants
    pub within_root: bool,
}

/// A workspace root that all tool paths are confined to
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox over an existing directory.
    ///
    /// The root is canonicalized once so later prefix checks compare resolved
    /// paths only.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        let canonical = dunce::canonicalize(root)?;
        if !canonical.is_dir() {
            return Err(SandboxError::InvalidRoot(canonical));
        }
        Ok(Self { root: canonical })
    }

    /// The canonical workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `requested` against the root without rejecting anything.
    pub fn check(&self, requested: impl AsRef<Path>) -> SandboxPath {
        path::resolve_within(&self.root, requested.as_ref())
    }

    /// Resolve `requested` and fail with [`SandboxError::AccessDenied`] if the
    /// result leaves the workspace.
    pub fn resolve(&self, requested: impl AsRef<Path>) -> Result<PathBuf, SandboxError> {
        let requested = requested.as_ref();
        let checked = self.check(requested);
        if checked.within_root {
            Ok(checked.target)
        } else {
            tracing::warn!(
                requested = %requested.display(),
                target = %checked.target.display(),
                "Rejected path outside workspace"
            );
            Err(SandboxError::AccessDenied {
                path: path_to_display(requested),
            })
        }
    }

    /// Path of `target` relative to the root, with forward slashes.
    pub fn relative_display(&self, target: &Path) -> String {
        target
            .strip_prefix(&self.root)
            .map(path_to_display)
            .unwrap_or_else(|_| path_to_display(target))
    }
}
