//! Errors produced by the API client.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Maximum length of a raw response body echoed back as a remote message.
const MAX_RAW_MESSAGE_LEN: usize = 500;

/// Coarse classification of an [`ApiError`], exposed to tool callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Unconfigured,
    InvalidRequest,
    Network,
    Timeout,
    HttpStatus,
    Parse,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::InvalidRequest => "invalid_request",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::Parse => "parse",
        }
    }
}

/// Errors that can occur while talking to the Com Laude API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No API key has been set.
    #[error("API client is not configured: call configure_api or set COMLAUDE_API_KEY")]
    Unconfigured,

    /// The request could not be built (bad base URL, bad header value, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// A single attempt exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success status.
    #[error("HTTP {status}{}", remote_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// A success response whose body is not valid JSON.
    #[error("Invalid response body: {0}")]
    Parse(String),
}

fn remote_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Unconfigured => ApiErrorKind::Unconfigured,
            Self::InvalidRequest(_) => ApiErrorKind::InvalidRequest,
            Self::Network(_) => ApiErrorKind::Network,
            Self::Timeout(_) => ApiErrorKind::Timeout,
            Self::Status { .. } => ApiErrorKind::HttpStatus,
            Self::Parse(_) => ApiErrorKind::Parse,
        }
    }

    /// HTTP status code, when the API answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error message reported by the API, if the body carried one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Only network errors, timeouts, 429 and 5xx responses qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// Build a status error from a response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: extract_remote_message(body),
        }
    }
}

/// 429 and 5xx are retried; everything else is permanent.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

/// Pull a human-readable message out of an error response body.
pub fn extract_remote_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let candidates = [
            json.get("message"),
            json.get("error").and_then(|e| e.get("message")),
            json.get("error"),
            json.get("detail"),
            json.get("error_description"),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str())
            .filter(|m| !m.is_empty())
        {
            return Some(message.to_string());
        }
    }

    Some(trimmed.chars().take(MAX_RAW_MESSAGE_LEN).collect())
}
