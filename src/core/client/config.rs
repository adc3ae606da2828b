//! Connection settings for the Com Laude API client.
//!
//! The configuration is created once at startup (from the environment) and
//! can be replaced at runtime through the `configure_api` tool. Updates are
//! validated as a whole before they are applied.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Default Com Laude API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.comlaude.com";

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff factor, in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

const REDACTED: &str = "[REDACTED]";

/// Errors raised when a configuration value is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("backoff factor must be a finite number >= 0 (got {0})")]
    InvalidBackoffFactor(f64),
}

impl ConfigError {
    /// Name of the argument that carried the rejected value.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyApiKey => "api_key",
            Self::InvalidBaseUrl { .. } => "base_url",
            Self::InvalidTimeout => "timeout_secs",
            Self::InvalidBackoffFactor(_) => "backoff_factor",
        }
    }
}

/// Effective client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.comlaude.com`.
    pub base_url: String,

    /// Bearer token. `None` means the client is unconfigured.
    pub api_key: Option<String>,

    /// Timeout applied to every individual HTTP attempt.
    pub timeout: Duration,

    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,

    /// Delay before retry `n` is `backoff_factor * 2^(n-1)` seconds.
    pub backoff_factor: f64,
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff_factor", &self.backoff_factor)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

/// A partial update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub backoff_factor: Option<f64>,
}

impl ClientConfig {
    /// Whether an API key has been provided.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyApiKey);
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            return Err(ConfigError::InvalidBackoffFactor(self.backoff_factor));
        }

        Ok(())
    }

    /// Apply an update atomically: on error `self` is left untouched.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), ConfigError> {
        let mut candidate = self.clone();

        if let Some(api_key) = update.api_key {
            candidate.api_key = Some(api_key);
        }
        if let Some(base_url) = update.base_url {
            candidate.base_url = base_url;
        }
        if let Some(timeout) = update.timeout {
            candidate.timeout = timeout;
        }
        if let Some(max_retries) = update.max_retries {
            candidate.max_retries = max_retries;
        }
        if let Some(backoff_factor) = update.backoff_factor {
            candidate.backoff_factor = backoff_factor;
        }

        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// JSON view of the configuration with the API key redacted.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "base_url": self.base_url,
            "api_key": self.api_key.as_ref().map(|_| REDACTED),
            "configured": self.is_configured(),
            "timeout_secs": self.timeout.as_secs_f64(),
            "max_retries": self.max_retries,
            "backoff_factor": self.backoff_factor,
        })
    }
}
