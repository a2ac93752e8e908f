//! HTTP client for search API calls and image downloads

use super::user_agent::{accept_image, user_agent};
use crate::engines::{EngineRequest, EngineResponse};
use crate::error::{NodeError, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Timeout applied to image downloads
pub const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client wrapper shared by the engine and the image fetcher
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    fetch_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings.
    ///
    /// No client-wide timeout is set: engine requests run unbounded, image
    /// fetches use [`IMAGE_FETCH_TIMEOUT`].
    pub fn new() -> Result<Self> {
        let client = Client::builder().gzip(true).brotli(true).build()?;

        Ok(Self {
            client,
            fetch_timeout: IMAGE_FETCH_TIMEOUT,
            user_agent: user_agent(),
        })
    }

    /// Override the image fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Execute an engine request
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent);

        // Add custom headers
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        // Add query parameters
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder
            .send()
            .await
            .map_err(NodeError::from_request)?;

        Self::parse_response(response).await
    }

    /// Download raw bytes from a URL, failing on any non-2xx status
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, timeout = ?self.fetch_timeout, "Fetching image");

        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_image())
            .send()
            .await
            .map_err(NodeError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(NodeError::from_request)?;
        debug!(size = bytes.len(), "Image downloaded successfully");

        Ok(bytes.to_vec())
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(NodeError::from_request)?;

        Ok(EngineResponse { status, text })
    }
}
