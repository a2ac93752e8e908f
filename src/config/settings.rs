//! Node configuration structure

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::error;

/// Environment override for the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment override for the search engine ID
pub const SEARCH_ENGINE_ID_ENV: &str = "GOOGLE_SEARCH_ENGINE_ID";

/// Errors from strict config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Credentials for the Google Custom Search JSON API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Google API key
    pub api_key: String,
    /// Programmable Search Engine ID (`cx`)
    pub search_engine_id: String,
}

impl NodeConfig {
    pub fn new(api_key: impl Into<String>, search_engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
        }
    }

    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: NodeConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load settings from a JSON file, falling back to an empty config on error
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Error loading config.json: {}", e);
                Self::default()
            }
        }
    }

    /// Merge with environment variables, ignoring empty values
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var(API_KEY_ENV) {
            if !val.is_empty() {
                self.api_key = val;
            }
        }
        if let Ok(val) = std::env::var(SEARCH_ENGINE_ID_ENV) {
            if !val.is_empty() {
                self.search_engine_id = val;
            }
        }
    }

    /// Both credentials are present
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.search_engine_id.is_empty()
    }
}
