//! Tool executor tests
//!
//! The executor must turn every outcome, including panics, into text.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use vics_core::tools::{Tool, ToolContext, ToolExecutor, ToolRegistry};
use vics_core::ToolError;
use vics_sandbox::Sandbox;

struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Always panics"
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _params: Value, _ctx: &ToolContext) -> Result<String, ToolError> {
        panic!("kaboom");
    }
}

struct FaultyTool;

#[async_trait]
impl Tool for FaultyTool {
    fn name(&self) -> &str {
        "faulty"
    }

    fn description(&self) -> &str {
        "Always fails with an execution fault"
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _params: Value, _ctx: &ToolContext) -> Result<String, ToolError> {
        Err(ToolError::Execution("subprocess went away".into()))
    }
}

fn standard_executor() -> (TempDir, ToolExecutor) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("hello.txt"), "hi there").unwrap();
    let ctx = ToolContext::new(Sandbox::new(dir.path()).unwrap());
    (dir, ToolExecutor::new(Arc::new(ToolRegistry::standard().unwrap()), ctx))
}

#[tokio::test]
async fn test_dispatches_by_name() {
    let (_dir, executor) = standard_executor();
    let output = executor.execute("read_file", json!({"path": "hello.txt"})).await;
    assert_eq!(output, "hi there");
}

#[tokio::test]
async fn test_unknown_tool_for_any_payload() {
    let (_dir, executor) = standard_executor();
    for args in [json!({}), json!(null), json!({"path": "x"}), json!([1, 2, 3])] {
        let output = executor.execute("rm_everything", args).await;
        assert_eq!(output, "Error: Unknown tool 'rm_everything'");
    }
}

#[tokio::test]
async fn test_missing_argument_becomes_text() {
    let (_dir, executor) = standard_executor();
    let output = executor.execute("write_file", json!({"path": "a.txt"})).await;
    assert!(
        output.starts_with("Error executing write_file: InvalidParams: missing field `content`"),
        "{}",
        output
    );
}

#[tokio::test]
async fn test_type_mismatch_becomes_text() {
    let (_dir, executor) = standard_executor();
    let output = executor.execute("read_file", json!({"path": 42})).await;
    assert!(output.starts_with("Error executing read_file: InvalidParams:"), "{}", output);
}

#[tokio::test]
async fn test_expected_error_renders_plainly() {
    let (_dir, executor) = standard_executor();
    let output = executor.execute("read_file", json!({"path": "../x"})).await;
    assert_eq!(output, "Error: Access denied: ../x escapes the workspace.");
}

#[tokio::test]
async fn test_panic_is_absorbed() {
    let dir = TempDir::new().unwrap();
    let registry = ToolRegistry::from_tools(vec![Arc::new(PanickingTool), Arc::new(FaultyTool)])
        .unwrap();
    let ctx = ToolContext::new(Sandbox::new(dir.path()).unwrap());
    let executor = ToolExecutor::new(Arc::new(registry), ctx);

    let output = executor.execute("explode", json!({})).await;
    assert_eq!(output, "Error executing explode: Panic: kaboom");

    let output = executor.execute("faulty", json!({})).await;
    assert_eq!(output, "Error executing faulty: ExecutionFault: subprocess went away");
}
