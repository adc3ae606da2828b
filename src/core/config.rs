//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::client::ClientConfig;
use super::transport::TransportConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Initial Com Laude API client settings.
    pub api: ClientConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "comlaude-api".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            api: ClientConfig::default(),
        }
    }
}

/// Parse an environment variable, keeping `current` when unset or invalid.
fn env_parse<T: FromStr>(key: &str, current: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value for {}: {:?}", key, raw);
                current
            }
        },
        Err(_) => current,
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...). API client settings use the
    /// `COMLAUDE_` prefix (`COMLAUDE_API_KEY`, `COMLAUDE_BASE_URL`,
    /// `COMLAUDE_TIMEOUT_SECS`, `COMLAUDE_MAX_RETRIES`,
    /// `COMLAUDE_BACKOFF_FACTOR`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.api = Self::api_from_env(config.api);

        config
    }

    fn api_from_env(mut api: ClientConfig) -> ClientConfig {
        match std::env::var("COMLAUDE_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                api.api_key = Some(key.trim().to_string());
                info!("Com Laude API key loaded from environment");
            }
            _ => warn!(
                "COMLAUDE_API_KEY not set - API tools will fail until configure_api is called"
            ),
        }

        if let Ok(base_url) = std::env::var("COMLAUDE_BASE_URL") {
            api.base_url = base_url.trim().to_string();
        }

        let timeout_secs = env_parse("COMLAUDE_TIMEOUT_SECS", api.timeout.as_secs());
        if timeout_secs > 0 {
            api.timeout = Duration::from_secs(timeout_secs);
        } else {
            warn!("Ignoring COMLAUDE_TIMEOUT_SECS=0");
        }

        api.max_retries = env_parse("COMLAUDE_MAX_RETRIES", api.max_retries);

        let backoff = env_parse("COMLAUDE_BACKOFF_FACTOR", api.backoff_factor);
        if backoff.is_finite() && backoff >= 0.0 {
            api.backoff_factor = backoff;
        } else {
            warn!("Ignoring invalid COMLAUDE_BACKOFF_FACTOR={}", backoff);
        }

        api
    }
}
