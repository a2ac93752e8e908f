//! Command-line runner for the image search node
//!
//! Runs one search the way the host would and optionally saves the result.

use anyhow::{Context, Result};
use clap::Parser;
use image_search_node::{config, GoogleImageSearchNode, NodeConfig, NodeRegistry};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "image-search-node", version, about = "Fetch the first Google image result for a query")]
struct Cli {
    /// Search query
    #[arg(default_value = image_search_node::node::DEFAULT_QUERY)]
    query: String,

    /// Path to config.json
    #[arg(short, long, env = config::CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Write the resulting image to this file (format from extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail with the underlying error instead of returning the placeholder
    #[arg(long)]
    strict: bool,

    /// Print the node registration and exit
    #[arg(long)]
    describe: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting image-search-node v{}", image_search_node::VERSION);

    if cli.describe {
        let registry = NodeRegistry::with_defaults();
        for name in registry.names() {
            if let Some(descriptor) = registry.get(name) {
                println!("{}", serde_json::to_string_pretty(descriptor)?);
                println!("{}", serde_json::to_string_pretty(&descriptor.input_types())?);
            }
        }
        return Ok(());
    }

    let node_config = match &cli.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            let mut node_config = NodeConfig::load_from(path);
            node_config.merge_env();
            node_config
        }
        None => config::load(),
    };

    let node = GoogleImageSearchNode::with_config(node_config)?;

    let tensor = if cli.strict {
        node.try_search_image(&cli.query)
            .await
            .with_context(|| format!("search for '{}' failed", cli.query))?
    } else {
        node.search_image(&cli.query).await
    };

    if tensor.is_placeholder() {
        warn!("Search failed, returning placeholder image");
    }
    println!("{:?}", tensor.shape());

    if let Some(path) = cli.output {
        let image = tensor
            .to_rgb_image()
            .context("tensor holds no image to save")?;
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved image to: {}", path.display());
    }

    Ok(())
}
