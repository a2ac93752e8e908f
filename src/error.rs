//! Error types for the image search node

use thiserror::Error;

/// Errors raised while searching for and converting an image.
///
/// None of these reach the host: [`crate::node::GoogleImageSearchNode::search_image`]
/// turns every variant into the red placeholder image.
#[derive(Debug, Error)]
pub enum NodeError {
    /// API key or search engine ID is empty
    #[error("API key and Search Engine ID are required")]
    MissingCredentials,

    /// Network-level error during HTTP communication
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Invalid API key or search engine ID
    #[error("Invalid API key or search engine ID")]
    Unauthorized,

    /// Daily quota or rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Search API returned an error status
    #[error("Search API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Search API body could not be understood
    #[error("Invalid response from search API: {0}")]
    InvalidResponse(String),

    /// Search succeeded but returned no image items
    #[error("No images found in search results")]
    NoResults,

    /// Image host answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    /// Fetched bytes are not a decodable image
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl NodeError {
    /// Short name of the error kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            NodeError::MissingCredentials => "MissingCredentials",
            NodeError::Network(_) => "Network",
            NodeError::Timeout => "Timeout",
            NodeError::Unauthorized => "Unauthorized",
            NodeError::RateLimited => "RateLimited",
            NodeError::Api { .. } => "Api",
            NodeError::InvalidResponse(_) => "InvalidResponse",
            NodeError::NoResults => "NoResults",
            NodeError::HttpStatus { .. } => "HttpStatus",
            NodeError::Decode(_) => "Decode",
        }
    }

    /// Map a reqwest error, separating out timeouts
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NodeError::Timeout
        } else {
            NodeError::Network(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, NodeError>;
