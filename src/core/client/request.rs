//! Request and response types for the API client.

use reqwest::{Method, Url};
use serde_json::Value;

use super::error::ApiError;

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,

    /// Raw (unencoded) path segments, e.g. `["groups", "g1", "accounts"]`.
    pub segments: Vec<String>,

    /// Query pairs, encoded in order.
    pub query: Vec<(String, String)>,

    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Human-readable path, used for logging.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Resolve against `base_url`, keeping any path prefix of the base.
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL '{base_url}': {e}")))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("base URL '{base_url}' cannot have a path")))?
            .pop_if_empty()
            .extend(&self.segments);

        if self.query.is_empty() {
            url.set_query(None);
        } else {
            let encoded = serde_urlencoded::to_string(&self.query)
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            url.set_query(Some(&encoded));
        }

        Ok(url)
    }
}

/// Successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,

    /// Parsed JSON body; an empty body is `null`.
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_url_with_query_in_order() {
        let request = ApiRequest::new(Method::GET, segments(&["groups", "g1", "accounts"]))
            .with_query(vec![
                ("limit".to_string(), "50".to_string()),
                ("page".to_string(), "1".to_string()),
            ]);

        let url = request.url("https://api.example.com").unwrap();
        assert_eq!(url.path(), "/groups/g1/accounts");
        assert_eq!(url.query(), Some("limit=50&page=1"));
        assert_eq!(
            url.as_str(),
            "https://api.example.com/groups/g1/accounts?limit=50&page=1"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let request = ApiRequest::new(Method::GET, segments(&["groups", "g1", "domains"]));

        let url = request.url("https://api.example.com/v2/").unwrap();
        assert_eq!(url.path(), "/v2/groups/g1/domains");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_url_encodes_segments() {
        let request = ApiRequest::new(Method::GET, segments(&["groups", "a/b c", "accounts"]));

        let url = request.url("https://api.example.com").unwrap();
        assert_eq!(url.path(), "/groups/a%2Fb%20c/accounts");
    }

    #[test]
    fn test_url_rejects_invalid_base() {
        let request = ApiRequest::new(Method::GET, segments(&["groups"]));
        assert!(matches!(
            request.url("not a url"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            request.url("mailto:someone@example.com"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_path_for_logging() {
        let request = ApiRequest::new(Method::POST, segments(&["groups", "g1", "accounts", "search"]));
        assert_eq!(request.path(), "/groups/g1/accounts/search");
    }
}
