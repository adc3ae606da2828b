//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The list of all available tools (catalog entries plus `configure_api`)
//! - Dispatch by name, shared by every transport

use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::sync::Arc;

use super::catalog::CATALOG;
use super::definitions::ConfigureApiTool;
use super::dispatcher::ToolDispatcher;
use crate::core::client::ApiClient;

/// Tool registry - manages all available tools.
#[derive(Clone)]
pub struct ToolRegistry {
    dispatcher: Arc<ToolDispatcher>,
}

impl ToolRegistry {
    /// Create a new tool registry around the shared API client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            dispatcher: Arc::new(ToolDispatcher::new(client)),
        }
    }

    /// The dispatcher used for calls.
    pub fn dispatcher(&self) -> &Arc<ToolDispatcher> {
        &self.dispatcher
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        CATALOG
            .iter()
            .map(|spec| spec.name)
            .chain(std::iter::once(ConfigureApiTool::NAME))
            .collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    pub fn get_all_tools() -> Vec<Tool> {
        CATALOG
            .iter()
            .map(|spec| spec.to_tool())
            .chain(std::iter::once(ConfigureApiTool::to_tool()))
            .collect()
    }

    /// Dispatch a tool call by name.
    pub async fn call_tool(&self, name: &str, arguments: &JsonObject) -> CallToolResult {
        self.dispatcher.call(name, arguments).await
    }
}
