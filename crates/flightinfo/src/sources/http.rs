//! HTTP client abstraction for testability.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::FailureCause;
use crate::error::{Error, Result};

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("flightinfo/", env!("CARGO_PKG_VERSION"));

/// Status line and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FailureCause::Parse`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, FailureCause> {
        serde_json::from_slice(&self.body).map_err(|e| FailureCause::Parse(e.to_string()))
    }
}

/// Trait for asynchronous HTTP GET requests.
///
/// Implementations report transport problems as [`FailureCause`]; status
/// handling is left to the caller so adapters can tell "not found" apart
/// from a failure.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `query` - Query string parameters
    /// * `headers` - Slice of (header_name, header_value) tuples
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> impl Future<Output = std::result::Result<HttpResponse, FailureCause>> + Send;
}

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a new client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpClient`] if the underlying client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> std::result::Result<HttpResponse, FailureCause> {
        trace!(url = url, "HTTP GET request starting");

        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                if e.is_timeout() {
                    return Err(FailureCause::Timeout(self.timeout));
                }
                return Err(FailureCause::Network(format!("request failed: {e}")));
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(HttpResponse::new(status, bytes.to_vec()))
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(FailureCause::Network(format!("failed to read response: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::MockHttpClient;

    #[test]
    fn test_response_is_success() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn test_response_is_blank() {
        assert!(HttpResponse::new(204, "").is_blank());
        assert!(HttpResponse::new(200, " \n").is_blank());
        assert!(!HttpResponse::new(200, "[]").is_blank());
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse::new(200, r#"{"a": 1}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["a"], 1);

        let bad = HttpResponse::new(200, "<html>");
        let result: std::result::Result<serde_json::Value, _> = bad.json();
        assert!(matches!(result, Err(FailureCause::Parse(_))));
    }

    #[test]
    fn test_client_builds() {
        assert!(ReqwestClient::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_records_requests() {
        let mock = MockHttpClient::ok(200, "{}");
        let response = mock
            .get("http://example.com/x", &[("q", "1")], &[])
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(mock.requests(), vec!["http://example.com/x?q=1".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient::failing(FailureCause::Network("refused".to_string()));
        let result = mock.get("http://example.com", &[], &[]).await;
        assert!(matches!(result, Err(FailureCause::Network(_))));
    }
}
