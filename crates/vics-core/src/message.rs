//! Provider-neutral conversation turns
//!
//! These types are the common language between the agent loop and the
//! provider adapters. Each adapter translates them to and from its own wire
//! format.

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model-issued request to run a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Correlation id assigned by the provider
    pub id: String,
    pub name: String,
    /// Raw argument JSON text, as emitted by the model
    pub arguments: String,
}

impl ToolRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Links a tool-role turn back to the request that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultRef {
    pub request_id: String,
    pub tool_name: String,
}

/// One entry in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    /// Text content, possibly empty
    #[serde(default)]
    pub text: String,
    /// Non-empty only on assistant turns that request tool use
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_requests: Vec<ToolRequest>,
    /// Present only on tool-role turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResultRef>,
}

impl Turn {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            tool_requests: Vec::new(),
            tool_result: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Assistant turn carrying tool requests alongside optional text
    pub fn assistant_with_tools(text: impl Into<String>, tool_requests: Vec<ToolRequest>) -> Self {
        Self {
            tool_requests,
            ..Self::new(Role::Assistant, text)
        }
    }

    /// Tool-role turn answering `request`
    pub fn tool_result(request: &ToolRequest, result: impl Into<String>) -> Self {
        Self {
            tool_result: Some(ToolResultRef {
                request_id: request.id.clone(),
                tool_name: request.name.clone(),
            }),
            ..Self::new(Role::Tool, result)
        }
    }

    pub fn has_tool_requests(&self) -> bool {
        !self.tool_requests.is_empty()
    }
}
