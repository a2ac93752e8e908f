//! image-search-node: a node-graph plugin that turns a text query into an image
//!
//! The node asks the Google Custom Search JSON API for one image result,
//! downloads it and converts it into the host's `(batch, height, width,
//! channel)` floating-point tensor. Any failure yields a red placeholder.

pub mod config;
pub mod engines;
pub mod error;
pub mod network;
pub mod node;
pub mod results;
pub mod tensor;

pub use config::NodeConfig;
pub use engines::Engine;
pub use error::NodeError;
pub use node::{GoogleImageSearchNode, Node, NodeRegistry};
pub use results::ImageHit;
pub use tensor::ImageTensor;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
