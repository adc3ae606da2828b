//! HTTP sending seam.
//!
//! The executor talks to the network through [`HttpSender`] so tests can
//! script responses and count calls without a live server.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A fully resolved HTTP request, ready to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure (no HTTP status was received).
#[derive(Debug, Clone, Error)]
pub enum SendError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError>;
}

/// Production sender backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new() -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SendError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SendError {
    if err.is_timeout() {
        SendError::Timeout
    } else if err.is_connect() {
        SendError::Network(format!("connection failed: {err}"))
    } else {
        SendError::Network(err.to_string())
    }
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        debug!("Response {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

/// Scripted sender for tests.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays queued outcomes in order and records every request.
    #[derive(Default)]
    pub(crate) struct MockSender {
        outcomes: Mutex<VecDeque<Result<HttpResponse, SendError>>>,
        calls: Mutex<Vec<(Instant, HttpRequest)>>,
    }

    impl MockSender {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
            self.push(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }))
        }

        pub(crate) fn push_raw(&self, status: u16, body: &str) -> &Self {
            self.push(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }))
        }

        pub(crate) fn push_error(&self, error: SendError) -> &Self {
            self.push(Err(error))
        }

        fn push(&self, outcome: Result<HttpResponse, SendError>) -> &Self {
            self.outcomes.lock().unwrap().push_back(outcome);
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, r)| r.clone())
                .collect()
        }

        pub(crate) fn call_instants(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    #[async_trait]
    impl HttpSender for MockSender {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
            self.calls.lock().unwrap().push((Instant::now(), request));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SendError::Network("no scripted response".to_string())))
        }
    }
}
