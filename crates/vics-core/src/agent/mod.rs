//! Agent orchestration
//!
//! [`AgentLoop`] drives the conversation; [`build_agent`] wires one up from
//! an [`AgentConfig`] with the standard tools and the configured provider.

mod agent_loop;
mod conversation;
mod events;
mod prompt;

pub use agent_loop::{
    parse_arguments, AgentLoop, LoopState, DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_MESSAGE,
};
pub use conversation::Conversation;
pub use events::{AgentEvent, EventSink, TracingSink};
pub use prompt::{SystemPrompt, DEFAULT_SYSTEM_PROMPT};

use std::sync::Arc;

use vics_sandbox::Sandbox;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::provider::{create_provider, Provider};
use crate::tools::{ToolContext, ToolExecutor, ToolRegistry};

/// Agent backed by a configured provider
pub type Agent = AgentLoop<Provider>;

/// Create the workspace if needed and build the sandboxed tool executor.
pub fn build_executor(config: &AgentConfig) -> Result<ToolExecutor> {
    std::fs::create_dir_all(&config.workspace)?;
    let sandbox = Sandbox::new(&config.workspace)?;
    tracing::info!(workspace = %sandbox.root().display(), "Workspace ready");

    let ctx = ToolContext::new(sandbox).with_policy(config.command_policy());
    let registry = ToolRegistry::standard()?;
    Ok(ToolExecutor::new(Arc::new(registry), ctx))
}

/// Build an agent from validated configuration.
pub fn build_agent(config: &AgentConfig) -> Result<Agent> {
    config.validate()?;
    let provider = create_provider(&config.llm)?;
    let executor = build_executor(config)?;
    let system_prompt = SystemPrompt::new()
        .with_workspace_context(executor.context().sandbox.root())
        .build();

    Ok(AgentLoop::new(provider, executor, system_prompt).with_max_iterations(config.max_iterations))
}
