//! Result type definitions

use serde::{Deserialize, Serialize};
use url::Url;

/// A single image search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHit {
    /// Direct link to the full-size image
    pub link: String,
    /// The title of the result
    #[serde(default)]
    pub title: String,
    /// MIME type reported by the search API
    pub mime: Option<String>,
    /// Image width in pixels, if known
    pub width: Option<u32>,
    /// Image height in pixels, if known
    pub height: Option<u32>,
    /// Page the image was found on
    pub context_link: Option<String>,
    /// Thumbnail URL
    pub thumbnail_link: Option<String>,
}

impl ImageHit {
    /// Image link as an absolute `http(s)` URL, or `None` if it cannot be fetched
    pub fn parsed_link(&self) -> Option<Url> {
        Url::parse(&self.link)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
    }
}
