//! Engine traits and types

use crate::error::Result;
use crate::results::ImageHit;
use std::collections::HashMap;

/// Result of an engine search
#[derive(Debug, Clone, Default)]
pub struct EngineResults {
    /// Image hits, in the order the API ranked them
    pub results: Vec<ImageHit>,
    /// Total number of results reported by the API (if known)
    pub number_of_results: Option<u64>,
}

impl EngineResults {
    pub fn first(&self) -> Option<&ImageHit> {
        self.results.first()
    }
}

/// Parameters for building a search request
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Number of results to request
    pub num: u32,
    /// Safe search enabled
    pub safesearch: bool,
}

impl RequestParams {
    /// Request a single image with safe search off
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            num: 1,
            safesearch: false,
        }
    }
}

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// HTTP response from engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Check if response indicates bad credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Trait implemented by image search engines
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Build the HTTP request for a search
    fn request(&self, params: &RequestParams) -> Result<EngineRequest>;

    /// Parse the HTTP response into results
    fn response(&self, response: EngineResponse) -> Result<EngineResults>;
}
