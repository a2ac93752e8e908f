//! Declarations the host reads to place a node in its graph

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Host type name of string inputs
pub const STRING: &str = "STRING";

/// Host type name of image tensors
pub const IMAGE: &str = "IMAGE";

/// One declared input socket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: String,
    pub kind: String,
    pub required: bool,
    pub default: Option<Value>,
}

impl InputSpec {
    /// A required string input
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: STRING.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Everything the host needs to list, wire and invoke a node class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescriptor {
    /// Key in the host's class mapping
    pub class_name: String,
    /// Name shown in the host UI
    pub display_name: String,
    /// Menu category
    pub category: String,
    /// Entry point invoked by the host
    pub function: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<String>,
}

impl NodeDescriptor {
    /// Input declaration in the host's `{"required": {name: [TYPE, {options}]}}` shape
    pub fn input_types(&self) -> Value {
        let mut required = Map::new();
        let mut optional = Map::new();

        for input in &self.inputs {
            let mut options = Map::new();
            if let Some(default) = &input.default {
                options.insert("default".to_string(), default.clone());
            }
            let entry = json!([input.kind, options]);
            if input.required {
                required.insert(input.name.clone(), entry);
            } else {
                optional.insert(input.name.clone(), entry);
            }
        }

        let mut types = Map::new();
        types.insert("required".to_string(), Value::Object(required));
        if !optional.is_empty() {
            types.insert("optional".to_string(), Value::Object(optional));
        }
        Value::Object(types)
    }

    /// Look up an input declaration by name
    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }
}
