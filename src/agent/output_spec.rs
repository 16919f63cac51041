//! Structured final-answer specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes the shape of a structured final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub description: String,
    pub schema: Value,
    pub strict: bool,
}

impl OutputSpec {
    /// Create a spec from a JSON schema. Object schemas are closed with
    /// `additionalProperties: false`.
    pub fn new(name: impl Into<String>, mut schema: Value) -> Self {
        if let Value::Object(obj) = &mut schema {
            obj.insert("additionalProperties".into(), Value::Bool(false));
        }
        Self {
            name: name.into(),
            description: String::new(),
            schema,
            strict: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
