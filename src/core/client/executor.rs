//! Request execution with retry and exponential backoff.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::config::{ClientConfig, ConfigError, ConfigUpdate};
use super::error::ApiError;
use super::request::{ApiRequest, ApiResponse};
use super::sender::{HttpRequest, HttpSender, ReqwestSender, SendError};

/// Retry settings captured from a configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Delay before retry `retry` (1-based): `backoff_factor * 2^(retry-1)` seconds.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl From<&ClientConfig> for RetryPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
        }
    }
}

/// Client for the Com Laude API.
///
/// Holds the runtime-mutable [`ClientConfig`] and the [`HttpSender`]. One
/// instance is created at startup and shared by every tool call.
pub struct ApiClient {
    config: RwLock<ClientConfig>,
    sender: Arc<dyn HttpSender>,
}

impl ApiClient {
    /// Create a client that sends requests with `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let sender = ReqwestSender::new().map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_sender(config, Arc::new(sender)))
    }

    /// Create a client with a custom sender.
    pub fn with_sender(config: ClientConfig, sender: Arc<dyn HttpSender>) -> Self {
        Self {
            config: RwLock::new(config),
            sender,
        }
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> ClientConfig {
        self.config.read().await.clone()
    }

    /// Update the configuration in place and return the new effective value.
    pub async fn reconfigure(&self, update: ConfigUpdate) -> Result<ClientConfig, ConfigError> {
        let mut config = self.config.write().await;
        config.apply(update)?;
        info!("API client reconfigured: {:?}", *config);
        Ok(config.clone())
    }

    /// Execute a request, retrying transient failures.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let config = self.config().await;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::Unconfigured)?;

        let http_request = HttpRequest {
            method: request.method.clone(),
            url: request.url(&config.base_url)?,
            headers: build_headers(api_key, request.body.is_some())?,
            body: request.body.clone(),
            timeout: config.timeout,
        };
        let policy = RetryPolicy::from(&config);
        let path = request.path();

        let mut retry = 0;
        loop {
            if retry > 0 {
                let delay = policy.delay_for(retry);
                debug!(
                    "Retrying {} {} (retry {}/{}) after {:?}",
                    request.method, path, retry, policy.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(http_request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && retry < policy.max_retries => {
                    warn!(
                        "{} {} attempt {} failed: {}",
                        request.method,
                        path,
                        retry + 1,
                        e
                    );
                    retry += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        error!(
                            "{} {} failed after {} attempt(s): {}",
                            request.method,
                            path,
                            retry + 1,
                            e
                        );
                    } else {
                        warn!("{} {} failed: {}", request.method, path, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// One HTTP exchange, classified.
    async fn attempt(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let timeout = request.timeout;
        let response = self.sender.send(request).await.map_err(|e| match e {
            SendError::Timeout => ApiError::Timeout(timeout),
            SendError::Network(msg) => ApiError::Network(msg),
        })?;

        if !(200..=299).contains(&response.status) {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        let body = if response.body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Parse(format!("JSON parse error: {e}")))?
        };

        Ok(ApiResponse {
            status: response.status,
            body,
        })
    }
}

fn build_headers(api_key: &str, has_body: bool) -> Result<HeaderMap, ApiError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| ApiError::InvalidRequest("API key contains invalid characters".to_string()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::sender::mock::MockSender;
    use reqwest::Method;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn config(max_retries: u32, backoff_factor: f64) -> ClientConfig {
        ClientConfig {
            base_url: "https://api.example.com".to_string(),
            api_key: Some("k".to_string()),
            max_retries,
            backoff_factor,
            ..Default::default()
        }
    }

    fn client(config: ClientConfig) -> (ApiClient, Arc<MockSender>) {
        let sender = Arc::new(MockSender::new());
        (ApiClient::with_sender(config, sender.clone()), sender)
    }

    fn list_accounts() -> ApiRequest {
        ApiRequest::new(
            Method::GET,
            vec!["groups".into(), "g1".into(), "accounts".into()],
        )
    }

    #[test]
    fn test_delay_doubles_per_retry() {
        let policy = RetryPolicy {
            max_retries: 5,
            backoff_factor: 0.5,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(4), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_zero_factor() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_factor: 0.0,
        };
        assert_eq!(policy.delay_for(3), Duration::ZERO);
        assert_eq!(policy.delay_for(1025), Duration::ZERO);
        assert_eq!(policy.delay_for(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_retries: u32::MAX,
            backoff_factor: 0.5,
        };
        assert_eq!(policy.delay_for(2000), Duration::MAX);
    }

    #[tokio::test]
    async fn test_unconfigured_makes_no_calls() {
        let (client, sender) = client(ClientConfig::default());

        let err = assert_err!(client.execute(&list_accounts()).await);
        assert!(matches!(err, ApiError::Unconfigured));
        assert_eq!(sender.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_sends_bearer_token() {
        let (client, sender) = client(config(2, 0.5));
        sender.push_json(200, json!({"accounts": []}));

        let response = assert_ok!(client.execute(&list_accounts()).await);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"accounts": []}));

        let requests = sender.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.example.com/groups/g1/accounts"
        );
        assert_eq!(requests[0].headers[AUTHORIZATION], "Bearer k");
        assert_eq!(requests[0].headers[ACCEPT], "application/json");
        assert!(requests[0].headers.get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_body_sets_content_type() {
        let (client, sender) = client(config(0, 0.0));
        sender.push_json(200, json!({"ok": true}));

        let request = list_accounts().with_body(json!({"name": "x"}));
        assert_ok!(client.execute(&request).await);

        let sent = &sender.requests()[0];
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");
        assert_eq!(sent.body, Some(json!({"name": "x"})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_succeeds_with_backoff() {
        let (client, sender) = client(config(3, 0.5));
        sender
            .push_error(SendError::Network("connection reset".into()))
            .push_raw(503, "Service Unavailable")
            .push_json(200, json!({"id": "a1"}));

        let response = assert_ok!(client.execute(&list_accounts()).await);
        assert_eq!(response.body, json!({"id": "a1"}));
        assert_eq!(sender.call_count(), 3);

        let instants = sender.call_instants();
        let expected = [Duration::from_millis(500), Duration::from_secs(1)];
        for (i, want) in expected.iter().enumerate() {
            let gap = instants[i + 1] - instants[i];
            assert!(
                gap >= *want && gap < *want + Duration::from_millis(5),
                "delay before retry {} was {:?}, expected {:?}",
                i + 1,
                gap,
                want
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_last_error() {
        let (client, sender) = client(config(2, 0.5));
        sender
            .push_raw(500, "boom")
            .push_error(SendError::Timeout)
            .push_raw(429, r#"{"message": "Too many requests"}"#);

        let err = assert_err!(client.execute(&list_accounts()).await);
        assert_eq!(sender.call_count(), 3);
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.remote_message(), Some("Too many requests"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_after_retries() {
        let (client, sender) = client(config(1, 0.5));
        sender
            .push_error(SendError::Timeout)
            .push_error(SendError::Timeout);

        let err = assert_err!(client.execute(&list_accounts()).await);
        assert!(matches!(err, ApiError::Timeout(_)));
        assert_eq!(sender.call_count(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let (client, sender) = client(config(3, 0.5));
        sender.push_json(404, json!({"message": "Account not found"}));

        let err = assert_err!(client.execute(&list_accounts()).await);
        assert_eq!(sender.call_count(), 1);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.remote_message(), Some("Account not found"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error_without_retry() {
        let (client, sender) = client(config(3, 0.5));
        sender.push_raw(200, "<html>oops</html>");

        let err = assert_err!(client.execute(&list_accounts()).await);
        assert!(matches!(err, ApiError::Parse(_)));
        assert_eq!(sender.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let (client, sender) = client(config(0, 0.0));
        sender.push_raw(204, "");

        let response = assert_ok!(client.execute(&list_accounts()).await);
        assert_eq!(response.status, 204);
        assert!(response.body.is_null());
    }

    #[tokio::test]
    async fn test_reconfigure_is_visible_to_next_call() {
        let (client, sender) = client(ClientConfig::default());
        sender.push_json(200, json!({}));

        let updated = client
            .reconfigure(ConfigUpdate {
                api_key: Some("new-key".into()),
                base_url: Some("https://sandbox.example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(updated.is_configured());

        assert_ok!(client.execute(&list_accounts()).await);
        let sent = &sender.requests()[0];
        assert_eq!(sent.url.host_str(), Some("sandbox.example.com"));
        assert_eq!(sent.headers[AUTHORIZATION], "Bearer new-key");
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let (client, sender) = client(config(0, 0.5));
        sender.push_raw(502, "bad gateway");

        assert_err!(client.execute(&list_accounts()).await);
        assert_eq!(sender.call_count(), 1);
    }
}
