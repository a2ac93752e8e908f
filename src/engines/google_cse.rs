//! Google Custom Search JSON API, image search

use super::traits::*;
use crate::config::NodeConfig;
use crate::error::{NodeError, Result};
use crate::network::accept_json;
use crate::results::ImageHit;
use serde::Deserialize;
use tracing::{debug, error, trace};

/// Production endpoint of the Custom Search JSON API
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search image engine
pub struct GoogleCse {
    base_url: String,
    api_key: String,
    search_engine_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseApiResponse {
    items: Option<Vec<CseItem>>,
    search_information: Option<CseSearchInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseSearchInformation {
    // Google encodes this count as a string
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: Option<String>,
    title: Option<String>,
    mime: Option<String>,
    image: Option<CseImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseImage {
    context_link: Option<String>,
    height: Option<u32>,
    width: Option<u32>,
    thumbnail_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CseErrorEnvelope {
    error: CseErrorBody,
}

#[derive(Debug, Deserialize)]
struct CseErrorBody {
    message: String,
}

impl GoogleCse {
    pub fn new(api_key: impl Into<String>, search_engine_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Self {
        Self::new(&config.api_key, &config.search_engine_id)
    }

    /// Sets a custom base URL for the API (useful for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_error(response: &EngineResponse) -> NodeError {
        let status = response.status;

        if response.is_rate_limited() {
            error!(status, "Rate limit exceeded");
            return NodeError::RateLimited;
        }

        let message = serde_json::from_str::<CseErrorEnvelope>(&response.text)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| response.text.clone());

        if response.is_unauthorized() {
            // Quota exhaustion is reported as 403 too
            let lower = message.to_lowercase();
            if lower.contains("quota") || lower.contains("rate") {
                error!(status, "Rate limit exceeded");
                return NodeError::RateLimited;
            }
            error!(status, "Unauthorized request");
            return NodeError::Unauthorized;
        }

        error!(status, message = %message, "Search API error");
        NodeError::Api { status, message }
    }
}

impl Engine for GoogleCse {
    fn name(&self) -> &str {
        "google_cse"
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest> {
        if self.api_key.is_empty() || self.search_engine_id.is_empty() {
            return Err(NodeError::MissingCredentials);
        }

        let safe = if params.safesearch { "active" } else { "off" };

        let request = EngineRequest::get(&self.base_url)
            .header("Accept", accept_json())
            .param("key", &self.api_key)
            .param("cx", &self.search_engine_id)
            .param("q", &params.query)
            .param("searchType", "image")
            .param("num", params.num.to_string())
            .param("safe", safe);

        trace!(query = %params.query, num = params.num, safe, "Search parameters");
        Ok(request)
    }

    fn response(&self, response: EngineResponse) -> Result<EngineResults> {
        debug!(status = response.status, "Received response from search API");

        if !response.is_success() {
            return Err(Self::api_error(&response));
        }

        let parsed: CseApiResponse = serde_json::from_str(&response.text).map_err(|e| {
            error!(error = %e, "Failed to parse search API response");
            NodeError::InvalidResponse(format!("JSON parse error: {e}"))
        })?;

        let results: Vec<ImageHit> = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                let link = item.link.filter(|l| !l.is_empty())?;
                let image = item.image;
                Some(ImageHit {
                    link,
                    title: item.title.unwrap_or_default(),
                    mime: item.mime,
                    width: image.as_ref().and_then(|i| i.width),
                    height: image.as_ref().and_then(|i| i.height),
                    context_link: image.as_ref().and_then(|i| i.context_link.clone()),
                    thumbnail_link: image.and_then(|i| i.thumbnail_link),
                })
            })
            .collect();

        if results.is_empty() {
            debug!(body = %response.text, "No images found in API response");
            return Err(NodeError::NoResults);
        }

        let number_of_results = parsed
            .search_information
            .and_then(|info| info.total_results)
            .and_then(|total| total.parse().ok());

        debug!(result_count = results.len(), "Search completed successfully");

        Ok(EngineResults {
            results,
            number_of_results,
        })
    }
}
