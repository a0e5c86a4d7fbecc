//! HTTP transport.
//!
//! The cache only needs "GET this URL with these headers, give me the status
//! and the body". [`Transport`] is that seam; [`HttpClient`] is the reqwest
//! implementation used outside of tests.

use crate::config::NetworkConfig;
use crate::{Result, ShopCacheError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw upstream response. Status classification is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking-from-the-caller's-view GET transport.
///
/// Implementations fail only for transport-level problems (DNS, TLS,
/// connection, timeout). Any HTTP status, including errors, is a successful
/// response at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// reqwest-backed transport with a fixed request timeout.
pub struct HttpClient {
    client: Client,
    /// Timeout applied to every request.
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(NetworkConfig::CONNECT_TIMEOUT.min(timeout))
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| ShopCacheError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self { client, timeout })
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_send_error(&self, url: &str, err: reqwest::Error) -> ShopCacheError {
        if err.is_timeout() {
            ShopCacheError::Timeout(self.timeout)
        } else {
            ShopCacheError::Network {
                message: format!("GET {} failed: {}", url, err),
                cause: std::error::Error::source(&err).map(|s| s.to_string()),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}
