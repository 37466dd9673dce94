//! Tool system for the Vics agent
//!
//! Tools are the actions the model can take. Each tool has:
//! - A name and description for the LLM
//! - A JSON schema for parameters
//! - An execute method returning a single text result

pub mod executor;
pub mod filesystem;
pub mod registry;
pub mod shell;
pub mod think;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vics_sandbox::{CommandPolicy, Sandbox};

use crate::error::ToolError;

pub use executor::ToolExecutor;
pub use registry::ToolRegistry;

/// Tool definition for LLM consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// Names listed under the schema's `required` key
    pub fn required(&self) -> Vec<&str> {
        self.parameters["required"]
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Everything a tool invocation is bound to besides its arguments
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub sandbox: Sandbox,
    pub policy: CommandPolicy,
}

impl ToolContext {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            policy: CommandPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CommandPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Core trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used by LLM to invoke)
    fn name(&self) -> &str;

    /// Description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with given parameters
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Deserialize tool arguments, reporting missing or mistyped fields as
/// [`ToolError::InvalidParams`].
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))
}
