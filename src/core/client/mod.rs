//! Com Laude API client.
//!
//! - `config`: runtime-mutable connection settings
//! - `request`: relative requests and parsed responses
//! - `sender`: the HTTP seam (`reqwest` in production)
//! - `executor`: authenticated execution with retry and backoff
//! - `error`: error taxonomy shared with the tools domain

mod config;
mod error;
mod executor;
mod request;
mod sender;

pub use config::{
    ClientConfig, ConfigError, ConfigUpdate, DEFAULT_BACKOFF_FACTOR, DEFAULT_BASE_URL,
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
};
pub use error::{ApiError, ApiErrorKind, extract_remote_message, is_transient_status};
pub use executor::{ApiClient, RetryPolicy};
pub use request::{ApiRequest, ApiResponse};
pub use sender::{HttpRequest, HttpResponse, HttpSender, ReqwestSender, SendError};

#[cfg(test)]
pub(crate) use sender::mock;
