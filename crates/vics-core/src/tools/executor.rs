//! Tool executor
//!
//! The single boundary where tool failures become text. Nothing raised inside
//! a tool, including a panic, unwinds past [`ToolExecutor::execute`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde_json::Value;

use crate::tools::{ToolContext, ToolDefinition, ToolRegistry};

/// Dispatches tool requests against a registry with a fixed context
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Run tool `name` with `args`, always producing a result string.
    pub async fn execute(&self, name: &str, args: Value) -> String {
        let Some(tool) = self.registry.get(name) else {
            tracing::warn!(tool = name, "Model requested unknown tool");
            return format!("Error: Unknown tool '{}'", name);
        };

        let start = Instant::now();
        let outcome = AssertUnwindSafe(tool.execute(args, &self.ctx))
            .catch_unwind()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(output)) => {
                tracing::debug!(tool = name, duration_ms, "Tool succeeded");
                output
            }
            Ok(Err(err)) => {
                tracing::debug!(tool = name, duration_ms, kind = err.kind(), error = %err, "Tool failed");
                err.render(name)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(tool = name, duration_ms, panic = %message, "Tool panicked");
                format!("Error executing {}: Panic: {}", name, message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
