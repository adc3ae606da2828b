//! Tool-specific error types.

use serde_json::{Value, json};
use thiserror::Error;

use crate::core::client::{ApiError, ConfigError};

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument was absent or null.
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    /// An argument had the wrong type or an out-of-range value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "missing parameter" error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Create a new "invalid parameter" error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::MissingParameter(_) => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Api(e) => e.kind().as_str(),
        }
    }

    /// Structured form returned to the caller.
    pub fn to_json(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Api(api) = self {
            error["transient"] = json!(api.is_transient());
            if let Some(status) = api.status() {
                error["status"] = json!(status);
            }
            if let Some(remote) = api.remote_message() {
                error["remote_message"] = json!(remote);
            }
        } else {
            error["transient"] = json!(false);
        }
        json!({ "error": error })
    }
}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.field(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ToolError::unknown_tool("x").kind(), "unknown_tool");
        assert_eq!(ToolError::missing("group_id").kind(), "missing_parameter");
        assert_eq!(ToolError::invalid("limit", "bad").kind(), "invalid_parameter");
        assert_eq!(ToolError::from(ApiError::Unconfigured).kind(), "unconfigured");
        assert_eq!(
            ToolError::from(ApiError::Network("reset".into())).kind(),
            "network"
        );
    }

    #[test]
    fn test_json_for_http_status() {
        let err = ToolError::from(ApiError::from_response(404, r#"{"message": "nope"}"#));
        let json = err.to_json();
        assert_eq!(json["error"]["kind"], "http_status");
        assert_eq!(json["error"]["status"], 404);
        assert_eq!(json["error"]["remote_message"], "nope");
        assert_eq!(json["error"]["transient"], false);
        assert_eq!(json["error"]["message"], "HTTP 404: nope");
    }

    #[test]
    fn test_json_for_validation() {
        let json = ToolError::missing("group_id").to_json();
        assert_eq!(json["error"]["kind"], "missing_parameter");
        assert_eq!(
            json["error"]["message"],
            "Missing required parameter 'group_id'"
        );
        assert!(json["error"].get("status").is_none());
    }

    #[test]
    fn test_config_error_maps_to_field() {
        let err = ToolError::from(ConfigError::InvalidBackoffFactor(-1.0));
        assert!(matches!(
            err,
            ToolError::InvalidParameter { ref name, .. } if name == "backoff_factor"
        ));
    }
}
