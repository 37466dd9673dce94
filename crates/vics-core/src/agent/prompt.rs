//! System prompt management

use std::path::Path;

/// Default system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are **Vics Agent**, an autonomous coding assistant created by Vics.
Your tagline: "Coding your day away."

You are an expert software engineer. You can read, write, edit and search files, and execute shell commands inside the user's workspace.

## Guidelines
- Break complex tasks into small, verifiable steps.
- Always read existing files before editing them.
- After writing code, run it or run its tests to verify correctness.
- Explain what you're doing briefly before each action.
- If you're unsure, use the `think` tool to reason step by step.
- Be concise and direct. Don't over-explain.
- If a task is impossible or dangerous, say so and explain why.
- When done, summarize what you accomplished.

## Workspace
All file operations are relative to the workspace directory.
The user's workspace is ready for you to use."#;

/// System prompt configuration and generation
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    base: String,
    context: Option<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPrompt {
    pub fn new() -> Self {
        Self::with_base(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            context: None,
        }
    }

    /// Add workspace context to the prompt
    pub fn with_workspace_context(mut self, workspace_path: &Path) -> Self {
        self.context = Some(format!(
            "\n\n## Current Workspace\nYou are working in: {}",
            vics_sandbox::path_to_display(workspace_path)
        ));
        self
    }

    pub fn build(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{}{}", self.base, ctx),
            None => self.base.clone(),
        }
    }
}
