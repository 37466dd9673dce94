//! Vics Core - Autonomous coding agent
//!
//! This crate provides the core functionality for the Vics agent:
//! - Provider-neutral conversation turns
//! - Chat Completions and Messages provider adapters
//! - Sandboxed file, search and shell tools
//! - The agent loop that ties them together
//! - Layered configuration

pub mod agent;
pub mod config;
pub mod error;
pub mod formatting;
pub mod message;
pub mod provider;
pub mod tools;

pub use config::{AgentConfig, LlmConfig, ShellConfig};
pub use error::{Error, Result, ToolError};
pub use message::{Role, ToolRequest, ToolResultRef, Turn};
pub use provider::{
    create_provider, GenerationSettings, LlmProvider, Provider, ProviderKind,
};
pub use tools::{Tool, ToolContext, ToolDefinition, ToolExecutor, ToolRegistry};

// Agent exports
pub use agent::{
    build_agent, build_executor, Agent, AgentEvent, AgentLoop, Conversation, EventSink,
    LoopState, SystemPrompt, TracingSink, MAX_ITERATIONS_MESSAGE,
};

// Formatting exports
pub use formatting::{shorten, summarize_arguments, truncate_result};
