//! Tool output shaping.
//!
//! Every tool call, successful or not, ends up as an MCP `CallToolResult`
//! with a text rendering for humans and structured content for programs.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};

use super::ToolError;

/// Output from a successful tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable rendering.
    pub text: String,

    /// Machine-readable result.
    pub data: serde_json::Value,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            data,
        }
    }
}

/// Convert a tool outcome into an MCP result. Errors become `isError: true`
/// results rather than protocol errors.
pub fn into_call_result(outcome: Result<ToolOutput, ToolError>) -> CallToolResult {
    match outcome {
        Ok(output) => CallToolResult {
            content: vec![Content::text(output.text)],
            structured_content: Some(output.data),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => CallToolResult {
            content: vec![Content::text(format!("Error: {e}"))],
            structured_content: Some(e.to_json()),
            is_error: Some(true),
            meta: None,
        },
    }
}

/// JSON rendering of a `CallToolResult`, as returned by the HTTP transport.
pub fn call_result_to_json(result: &CallToolResult) -> serde_json::Value {
    let mut response = serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    });

    if let (Some(structured), Some(object)) =
        (&result.structured_content, response.as_object_mut())
    {
        object.insert("structuredContent".to_string(), structured.clone());
    }

    response
}
