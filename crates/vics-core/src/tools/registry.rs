//! Tool registry
//!
//! A fixed, ordered catalog built once at startup. Names are checked for
//! uniqueness when the registry is constructed; after that it is read-only.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tools::filesystem::{
    DeleteFile, EditFile, ListDirectory, ReadFile, SearchFiles, WriteFile,
};
use crate::tools::shell::RunCommand;
use crate::tools::think::Think;
use crate::tools::{Tool, ToolDefinition};

/// Read-only catalog of tools, in registration order
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from `tools`, rejecting a name that appears twice.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if index.insert(tool.name().to_string(), position).is_some() {
                return Err(Error::DuplicateTool(tool.name().to_string()));
            }
        }
        Ok(Self { tools, index })
    }

    /// The eight standard workspace tools
    pub fn standard() -> Result<Self> {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(ReadFile),
            Arc::new(WriteFile),
            Arc::new(EditFile),
            Arc::new(ListDirectory),
            Arc::new(SearchFiles),
            Arc::new(RunCommand),
            Arc::new(DeleteFile),
            Arc::new(Think),
        ];
        Self::from_tools(tools)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Schemas to advertise to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
