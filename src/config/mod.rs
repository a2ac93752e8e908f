//! Configuration module for the image search node
//!
//! Handles locating and loading `config.json` and applying environment overrides.

mod settings;

pub use settings::*;

use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "IMAGE_SEARCH_CONFIG";

/// File name looked up in the working and user config directories
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Config path set through [`CONFIG_PATH_ENV`], if any
pub fn explicit_path() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// Candidate config locations, in lookup order
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit_path() {
        paths.push(path);
    }

    paths.push(PathBuf::from(CONFIG_FILE_NAME));

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("image-search-node").join(CONFIG_FILE_NAME));
    }

    paths
}

/// Load the first existing file among `paths`, or an empty config
pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> NodeConfig {
    let found: Option<&Path> = paths.iter().map(|p| p.as_ref()).find(|p| p.exists());

    match found {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            NodeConfig::load_from(path)
        }
        None => {
            warn!(
                "{} not found. Please copy config.json.example to config.json and add your credentials.",
                CONFIG_FILE_NAME
            );
            NodeConfig::default()
        }
    }
}

/// Load the node configuration from the first existing candidate path.
///
/// Never fails: a missing or unreadable file yields an empty configuration
/// and a diagnostic. Environment overrides are applied last.
pub fn load() -> NodeConfig {
    if let Some(path) = explicit_path() {
        if !path.exists() {
            warn!(
                "{} points at missing file {}, falling back to default locations",
                CONFIG_PATH_ENV,
                path.display()
            );
        }
    }

    let mut config = load_first(&candidate_paths());
    config.merge_env();
    config
}
