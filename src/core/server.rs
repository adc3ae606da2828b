//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! API tools are rows in `domains/tools/catalog.rs`, executed by the shared
//! dispatcher. The ToolRouter is built dynamically in `domains/tools/router.rs`,
//! so adding a tool does not require modifying this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::client::ApiClient;
use super::config::Config;
use super::error::Result as ServerResult;
use crate::domains::{
    resources::ResourceService,
    tools::{ToolError, ToolRegistry, build_tool_router, call_result_to_json},
};

/// Instructions sent to clients on initialization.
pub const SERVER_INSTRUCTIONS: &str = "Com Laude domain registrar API. Tools list, read, search \
and update accounts, and list domains, SSL certificates, contacts and services for a group. \
Call configure_api first if no API key is configured. Resources under comlaude:// describe \
each API family.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared Com Laude API client.
    client: Arc<ApiClient>,

    /// Tool registry used for name-based dispatch.
    registry: ToolRegistry,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails if the initial API settings are invalid or the HTTP client
    /// cannot be built. A missing API key is not an error.
    pub fn new(config: Config) -> ServerResult<Self> {
        config.api.validate()?;
        let client = Arc::new(ApiClient::new(config.api.clone())?);
        Ok(Self::with_client(config, client))
    }

    /// Create a server around an existing API client.
    pub fn with_client(config: Config, client: Arc<ApiClient>) -> Self {
        let registry = ToolRegistry::new(client.clone());

        Self {
            tool_router: build_tool_router::<Self>(&registry),
            config: Arc::new(config),
            client,
            registry,
            resource_service: Arc::new(ResourceService::new()),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared API client.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Tool failures come back as `Ok` with `isError: true`; only malformed
    /// arguments are rejected here.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> ServerResult<serde_json::Value> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid(
                    "arguments",
                    format!("must be an object, got {other}"),
                )
                .into());
            }
        };

        let result = self.registry.call_tool(name, &arguments).await;
        Ok(call_result_to_json(&result))
    }

    /// List all available resources (for HTTP transport).
    pub fn list_resources(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resources()
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub fn read_resource(&self, uri: &str) -> ServerResult<serde_json::Value> {
        let result = self.resource_service.read_resource(uri)?;
        Ok(serde_json::json!({
            "contents": result.contents
        }))
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.resource_service.list_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::{ClientConfig, mock::MockSender};

    fn test_server(sender: Arc<MockSender>) -> McpServer {
        let api = ClientConfig {
            api_key: Some("secret-key".to_string()),
            ..ClientConfig::default()
        };
        McpServer::with_client(Config::default(), Arc::new(ApiClient::with_sender(api, sender)))
    }

    #[test]
    fn test_new_rejects_invalid_api_settings() {
        let mut config = Config::default();
        config.api.base_url = "ftp://api.example.com".to_string();
        assert!(matches!(
            McpServer::new(config),
            Err(crate::core::Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_new_without_api_key_is_unconfigured() {
        let server = McpServer::new(Config::default()).unwrap();
        assert!(!server.client().config().await.is_configured());
        assert_eq!(server.name(), "comlaude-api");
    }

    #[test]
    fn test_server_info() {
        let server = test_server(Arc::new(MockSender::new()));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "comlaude-api");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_list_tools_and_resources() {
        let server = test_server(Arc::new(MockSender::new()));
        assert_eq!(server.list_tools().len(), 10);

        let resources = server.list_resources();
        assert_eq!(resources.len(), 5);
        assert_eq!(resources[0]["uri"], "comlaude://accounts");
        assert_eq!(resources[0]["mimeType"], "application/json");
    }

    #[test]
    fn test_read_unknown_resource() {
        let server = test_server(Arc::new(MockSender::new()));
        assert!(server.read_resource("comlaude://nope").is_err());
        assert!(server.read_resource("comlaude://domains").is_ok());
    }

    #[tokio::test]
    async fn test_call_tool_over_http_shape() {
        let sender = Arc::new(MockSender::new());
        sender.push_json(200, serde_json::json!({"id": "d1", "name": "example.com"}));
        let server = test_server(sender.clone());

        let result = server
            .call_tool(
                "get_domain",
                serde_json::json!({"group_id": "g1", "domain_id": "d1"}),
            )
            .await
            .unwrap();

        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["data"]["name"], "example.com");
        assert_eq!(sender.call_count(), 1);
    }

    #[tokio::test]
    async fn test_call_tool_rejects_non_object_arguments() {
        let sender = Arc::new(MockSender::new());
        let server = test_server(sender.clone());
        assert!(server.call_tool("get_domains", serde_json::json!([1])).await.is_err());
        assert_eq!(sender.call_count(), 0);
    }

    #[tokio::test]
    async fn test_configure_api_is_visible_to_server_client() {
        let server = test_server(Arc::new(MockSender::new()));
        server
            .call_tool(
                "configure_api",
                serde_json::json!({"api_key": "rotated", "max_retries": 1}),
            )
            .await
            .unwrap();

        let config = server.client().config().await;
        assert_eq!(config.api_key.as_deref(), Some("rotated"));
        assert_eq!(config.max_retries, 1);
    }
}
