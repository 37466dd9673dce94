//! Shell command policy
//!
//! A literal substring denylist. This is a minimum safety net for obviously
//! destructive commands, not a security boundary: plenty of harmful commands
//! are not on the list.

use serde::Serialize;

use crate::SandboxError;

/// Patterns every policy blocks, regardless of configuration
pub const BASELINE_DENYLIST: &[&str] = &[
    "rm -rf /",
    "format c:",
    "del /f /s /q c:",
    ":(){:|:&};:",
    "mkfs",
    "dd if=/dev/zero of=/dev/",
];

/// Denylist of destructive command patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPolicy {
    denylist: Vec<String>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self {
            denylist: BASELINE_DENYLIST.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CommandPolicy {
    /// Baseline policy extended with extra patterns
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::default();
        for pattern in patterns {
            let pattern = pattern.into().to_lowercase();
            if !pattern.is_empty() && !policy.denylist.contains(&pattern) {
                policy.denylist.push(pattern);
            }
        }
        policy
    }

    pub fn patterns(&self) -> &[String] {
        &self.denylist
    }

    /// First denylisted pattern contained in `command`, compared case-insensitively
    pub fn blocked_pattern(&self, command: &str) -> Option<&str> {
        let lowered = command.to_lowercase();
        self.denylist
            .iter()
            .find(|pattern| lowered.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Reject a command before it reaches a subprocess
    pub fn check(&self, command: &str) -> Result<(), SandboxError> {
        match self.blocked_pattern(command) {
            Some(pattern) => {
                tracing::warn!(command, pattern, "Blocked shell command");
                Err(SandboxError::Blocked {
                    pattern: pattern.to_string(),
                })
            }
            None => Ok(()),
        }
    }
}
