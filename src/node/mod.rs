//! The Google image search node
//!
//! Searches for a query, downloads the first image hit and hands it to the
//! host as an image tensor. Failures never reach the host: every error is
//! logged and replaced by the red placeholder image.

pub mod descriptor;
mod registry;

pub use descriptor::{InputSpec, NodeDescriptor, IMAGE, STRING};
pub use registry::{NodeFactory, NodeRegistry};

use crate::config::{self, NodeConfig};
use crate::engines::{Engine, GoogleCse, RequestParams};
use crate::error::{NodeError, Result};
use crate::network::HttpClient;
use crate::tensor::ImageTensor;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Class name the node registers under
pub const CLASS_NAME: &str = "GoogleImageSearchNode";

/// Name shown in the host UI
pub const DISPLAY_NAME: &str = "Google Image Search";

/// Menu category
pub const CATEGORY: &str = "Custom Nodes/Google";

/// Name of the single input
pub const QUERY_INPUT: &str = "search_query";

/// Query used when the host supplies none
pub const DEFAULT_QUERY: &str = "cat";

/// Value produced on an output socket
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Image(ImageTensor),
}

/// A unit of computation the host can place in its graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Declared inputs, outputs and naming
    fn descriptor(&self) -> NodeDescriptor;

    /// Run the node with the host-supplied inputs
    async fn execute(&self, inputs: &Map<String, Value>) -> Vec<NodeOutput>;
}

/// Node that turns a text query into the first matching Google image
pub struct GoogleImageSearchNode {
    config: NodeConfig,
    engine: Arc<dyn Engine>,
    client: HttpClient,
}

impl GoogleImageSearchNode {
    /// Create a node using the config found on disk or in the environment
    pub fn new() -> Result<Self> {
        Self::with_config(config::load())
    }

    /// Create a node with explicit credentials
    pub fn with_config(config: NodeConfig) -> Result<Self> {
        let engine = Arc::new(GoogleCse::from_config(&config));
        Ok(Self {
            config,
            engine,
            client: HttpClient::new()?,
        })
    }

    /// Send search requests to another endpoint.
    ///
    /// The engine is rebuilt from the node's own config, so the credential
    /// check and the outbound request always agree.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.engine = Arc::new(GoogleCse::from_config(&self.config).with_base_url(base_url));
        self
    }

    /// Static declaration of this node class
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            class_name: CLASS_NAME.to_string(),
            display_name: DISPLAY_NAME.to_string(),
            category: CATEGORY.to_string(),
            function: "search_image".to_string(),
            inputs: vec![InputSpec::string(QUERY_INPUT).with_default(DEFAULT_QUERY)],
            outputs: vec![IMAGE.to_string()],
        }
    }

    /// Search for `query` and return the first image hit as a tensor.
    ///
    /// Always returns a well-formed tensor; on any failure this is the
    /// 1x64x64x3 red placeholder.
    pub async fn search_image(&self, query: &str) -> ImageTensor {
        match self.try_search_image(query).await {
            Ok(tensor) => tensor,
            Err(NodeError::MissingCredentials) => {
                error!("Error: API key and Search Engine ID are required. Please configure config.json");
                ImageTensor::placeholder()
            }
            Err(e) => {
                error!(
                    "Detailed error in Google Image Search: {}: {}",
                    e.kind(),
                    e
                );
                ImageTensor::placeholder()
            }
        }
    }

    /// Same pipeline as [`search_image`](Self::search_image) but surfaces the failure
    pub async fn try_search_image(&self, query: &str) -> Result<ImageTensor> {
        if !self.config.is_complete() {
            return Err(NodeError::MissingCredentials);
        }

        info!("Starting search for: {}", query);

        let request = self.engine.request(&RequestParams::new(query))?;
        let response = self.client.execute(request).await?;
        info!("Search API response received from {}", self.engine.name());

        let results = self.engine.response(response)?;
        if let Some(total) = results.number_of_results {
            debug!("Search reported {} total results", total);
        }

        let hit = results.first().ok_or(NodeError::NoResults)?;
        let link = hit.parsed_link().ok_or_else(|| {
            NodeError::InvalidResponse(format!("unfetchable image link: {}", hit.link))
        })?;
        info!("Found image URL: {}", link);

        let bytes = self.client.fetch_bytes(link.as_str()).await?;
        let tensor = ImageTensor::decode(&bytes)?;

        info!(
            "Successfully created tensor with shape: {:?}",
            tensor.shape()
        );
        Ok(tensor)
    }

    fn query_from_inputs(inputs: &Map<String, Value>) -> String {
        match inputs.get(QUERY_INPUT) {
            Some(Value::String(query)) => query.clone(),
            Some(other) => {
                warn!("Non-string {} input {}, using default", QUERY_INPUT, other);
                DEFAULT_QUERY.to_string()
            }
            None => {
                debug!("No {} input, using default", QUERY_INPUT);
                DEFAULT_QUERY.to_string()
            }
        }
    }
}

#[async_trait]
impl Node for GoogleImageSearchNode {
    fn descriptor(&self) -> NodeDescriptor {
        Self::descriptor()
    }

    async fn execute(&self, inputs: &Map<String, Value>) -> Vec<NodeOutput> {
        let query = Self::query_from_inputs(inputs);
        vec![NodeOutput::Image(self.search_image(&query).await)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::json;
    use std::io::Cursor;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/customsearch/v1";
    const IMAGE_PATH: &str = "/images/cat.png";

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 10) as u8, (y * 20) as u8, 128])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn node_for(server: &MockServer, config: NodeConfig) -> GoogleImageSearchNode {
        GoogleImageSearchNode::with_config(config)
            .unwrap()
            .with_base_url(format!("{}{}", server.uri(), SEARCH_PATH))
    }

    fn credentials() -> NodeConfig {
        NodeConfig::new("test-key", "test-cx")
    }

    async fn mount_search(server: &MockServer, body: Value) {
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn one_item(server: &MockServer) -> Value {
        json!({
            "items": [{
                "title": "A cat",
                "link": format!("{}{}", server.uri(), IMAGE_PATH),
                "mime": "image/png"
            }]
        })
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for config in [
            NodeConfig::default(),
            NodeConfig::new("key-only", ""),
            NodeConfig::new("", "cx-only"),
        ] {
            let node = node_for(&server, config);
            let tensor = node.search_image("cat").await;
            assert_eq!(tensor.shape(), [1, 64, 64, 3]);
            assert!(tensor.channel(0).all(|v| v == 1.0));
            assert!(tensor.channel(1).all(|v| v == 0.0));
            assert!(tensor.channel(2).all(|v| v == 0.0));
        }
    }

    #[test]
    fn test_blocking_call_without_credentials() {
        let node = GoogleImageSearchNode::with_config(NodeConfig::default()).unwrap();
        let tensor = tokio_test::block_on(node.search_image("cat"));
        assert!(tensor.is_placeholder());
    }

    #[tokio::test]
    async fn test_empty_results_give_placeholder() {
        let server = MockServer::start().await;
        mount_search(&server, json!({"searchInformation": {"totalResults": "0"}})).await;

        let node = node_for(&server, credentials());
        assert!(node.search_image("nothing matches this").await.is_placeholder());
        assert!(matches!(
            node.try_search_image("nothing matches this").await,
            Err(NodeError::NoResults)
        ));
    }

    #[tokio::test]
    async fn test_successful_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", "tabby cat"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .and(query_param("searchType", "image"))
            .and(query_param("num", "1"))
            .and(query_param("safe", "off"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_item(&server)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(12, 7)))
            .expect(1)
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        let tensor = node.search_image("tabby cat").await;

        assert_eq!(tensor.shape(), [1, 7, 12, 3]);
        assert!(tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(tensor.get(0, 6, 11, 0), Some(110.0 / 255.0));
        assert_eq!(tensor.get(0, 6, 11, 1), Some(120.0 / 255.0));
        assert_eq!(tensor.get(0, 6, 11, 2), Some(128.0 / 255.0));
    }

    #[tokio::test]
    async fn test_image_fetch_error_gives_placeholder() {
        let server = MockServer::start().await;
        mount_search(&server, one_item(&server)).await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        assert!(node.search_image("cat").await.is_placeholder());
        assert!(matches!(
            node.try_search_image("cat").await,
            Err(NodeError::HttpStatus { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_relative_link_gives_placeholder() {
        let server = MockServer::start().await;
        mount_search(&server, json!({"items": [{"link": IMAGE_PATH}]})).await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(2, 2)))
            .expect(0)
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        assert!(node.search_image("cat").await.is_placeholder());
        assert!(matches!(
            node.try_search_image("cat").await,
            Err(NodeError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_undecodable_image_gives_placeholder() {
        let server = MockServer::start().await;
        mount_search(&server, one_item(&server)).await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not an image</html>"))
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        assert!(node.search_image("cat").await.is_placeholder());
        assert!(matches!(
            node.try_search_image("cat").await,
            Err(NodeError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_api_error_gives_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid."}
            })))
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        assert!(node.search_image("cat").await.is_placeholder());
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let server = MockServer::start().await;
        mount_search(&server, one_item(&server)).await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(9, 5)))
            .expect(2)
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        let first = node.search_image("cat").await;
        let second = node.search_image("cat").await;

        assert_eq!(first, second);
        assert!(!first.is_placeholder());
    }

    #[tokio::test]
    async fn test_execute_uses_default_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", DEFAULT_QUERY))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_item(&server)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(3, 3)))
            .mount(&server)
            .await;

        let node = node_for(&server, credentials());
        let outputs = node.execute(&Map::new()).await;

        assert_eq!(outputs.len(), 1);
        let NodeOutput::Image(tensor) = &outputs[0];
        assert_eq!(tensor.shape(), [1, 3, 3, 3]);
    }

    #[test]
    fn test_descriptor() {
        let descriptor = GoogleImageSearchNode::descriptor();

        assert_eq!(descriptor.class_name, "GoogleImageSearchNode");
        assert_eq!(descriptor.display_name, "Google Image Search");
        assert_eq!(descriptor.category, "Custom Nodes/Google");
        assert_eq!(descriptor.outputs, vec!["IMAGE".to_string()]);
        assert_eq!(
            descriptor.input_types(),
            json!({"required": {"search_query": ["STRING", {"default": "cat"}]}})
        );
    }
}
