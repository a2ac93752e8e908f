//! Node registry mapping class names to descriptors and constructors

use super::descriptor::NodeDescriptor;
use super::{GoogleImageSearchNode, Node};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Constructor for a node instance
pub type NodeFactory = fn() -> Result<Arc<dyn Node>>;

struct RegistryEntry {
    descriptor: NodeDescriptor,
    factory: NodeFactory,
}

/// Registry of all node classes this plugin exposes
pub struct NodeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every node shipped by this crate
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(GoogleImageSearchNode::descriptor(), || {
            Ok(Arc::new(GoogleImageSearchNode::new()?) as Arc<dyn Node>)
        });
        registry
    }

    /// Register a node class
    pub fn register(&mut self, descriptor: NodeDescriptor, factory: NodeFactory) {
        info!(
            "Registered node: {} ({})",
            descriptor.class_name, descriptor.display_name
        );
        self.entries.insert(
            descriptor.class_name.clone(),
            RegistryEntry { descriptor, factory },
        );
    }

    /// Get a descriptor by class name
    pub fn get(&self, class_name: &str) -> Option<&NodeDescriptor> {
        self.entries.get(class_name).map(|e| &e.descriptor)
    }

    /// Display name for a class
    pub fn display_name(&self, class_name: &str) -> Option<&str> {
        self.get(class_name).map(|d| d.display_name.as_str())
    }

    /// Instantiate a node by class name
    pub fn create(&self, class_name: &str) -> Option<Result<Arc<dyn Node>>> {
        self.entries.get(class_name).map(|e| (e.factory)())
    }

    /// Class name to display name, as the host expects it
    pub fn display_name_mappings(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .map(|(name, e)| (name.clone(), e.descriptor.display_name.clone()))
            .collect()
    }

    /// Get all class names
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a class is registered
    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
