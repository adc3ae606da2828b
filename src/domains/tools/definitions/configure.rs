//! API configuration tool.
//!
//! Updates the shared API client settings at runtime. Unlike the catalog
//! tools it never calls the remote API.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::core::client::{ApiClient, ConfigUpdate};
use crate::domains::tools::handlers::ToolOutput;
use crate::domains::tools::{ToolError, require_present};

/// Parameters for the configuration tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConfigureApiParams {
    /// Com Laude API key.
    #[schemars(description = "Com Laude API key")]
    pub api_key: String,

    /// API base URL.
    #[schemars(description = "API base URL (default: https://api.comlaude.com)")]
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds.
    #[schemars(description = "Per-request timeout in seconds (default: 30)")]
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retries for transient failures.
    #[schemars(description = "Retries after the first attempt for network errors, timeouts, 429 and 5xx (default: 3)")]
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Backoff factor in seconds.
    #[schemars(description = "Delay before retry n is backoff_factor * 2^(n-1) seconds (default: 0.5)")]
    #[serde(default)]
    pub backoff_factor: Option<f64>,
}

impl From<ConfigureApiParams> for ConfigUpdate {
    fn from(params: ConfigureApiParams) -> Self {
        Self {
            api_key: Some(params.api_key),
            base_url: params.base_url,
            timeout: params.timeout_secs.map(Duration::from_secs),
            max_retries: params.max_retries,
            backoff_factor: params.backoff_factor,
        }
    }
}

/// Configuration tool implementation.
#[derive(Debug, Clone)]
pub struct ConfigureApiTool;

impl ConfigureApiTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "configure_api";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Configure API client settings. Omitted optional fields keep their current value. Returns the effective configuration with the API key redacted.";

    const REQUIRED: &'static [&'static str] = &["api_key"];

    /// Apply the arguments to the client configuration.
    pub async fn execute(client: &ApiClient, arguments: &JsonObject) -> Result<ToolOutput, ToolError> {
        require_present(arguments, Self::REQUIRED)?;

        let params: ConfigureApiParams =
            serde_json::from_value(serde_json::Value::Object(arguments.clone()))
                .map_err(|e| ToolError::invalid("arguments", e.to_string()))?;

        let config = client.reconfigure(params.into()).await?;
        info!("API client configured with base URL: {}", config.base_url);

        let mut data = config.redacted();
        data["updated_at"] = serde_json::json!(chrono::Utc::now().to_rfc3339());

        Ok(ToolOutput::new(
            format!("API client configured with base URL: {}", config.base_url),
            data,
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ConfigureApiParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::{ClientConfig, mock::MockSender};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (ApiClient, Arc<MockSender>) {
        let sender = Arc::new(MockSender::new());
        (ApiClient::with_sender(ClientConfig::default(), sender.clone()), sender)
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_configure_updates_and_redacts() {
        let (client, sender) = client();
        let output = ConfigureApiTool::execute(
            &client,
            &args(json!({
                "api_key": "k",
                "base_url": "https://api.example.com",
                "max_retries": 2,
                "backoff_factor": 0.5
            })),
        )
        .await
        .unwrap();

        assert_eq!(output.data["api_key"], "[REDACTED]");
        assert_eq!(output.data["base_url"], "https://api.example.com");
        assert_eq!(output.data["max_retries"], 2);
        assert_eq!(output.data["backoff_factor"], 0.5);
        assert_eq!(output.data["configured"], true);
        assert!(output.data["updated_at"].is_string());
        assert!(!output.text.contains("\"k\""));

        let config = client.config().await;
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_retries, 2);
        assert_eq!(sender.call_count(), 0);
    }

    #[tokio::test]
    async fn test_configure_requires_api_key() {
        let (client, _) = client();
        let err = ConfigureApiTool::execute(&client, &args(json!({"base_url": "https://x.io"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingParameter(ref p) if p == "api_key"));
        assert!(!client.config().await.is_configured());
    }

    #[tokio::test]
    async fn test_configure_invalid_backoff_keeps_previous() {
        let (client, _) = client();
        ConfigureApiTool::execute(&client, &args(json!({"api_key": "first"})))
            .await
            .unwrap();

        let err = ConfigureApiTool::execute(
            &client,
            &args(json!({"api_key": "second", "backoff_factor": -3.0})),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(client.config().await.api_key.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_configure_rejects_wrong_types() {
        let (client, _) = client();
        let err = ConfigureApiTool::execute(
            &client,
            &args(json!({"api_key": "k", "max_retries": "lots"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_schema_lists_api_key_as_required() {
        let tool = ConfigureApiTool::to_tool();
        let required = tool.input_schema.get("required").unwrap();
        assert!(required.as_array().unwrap().iter().any(|v| v == "api_key"));
    }
}
