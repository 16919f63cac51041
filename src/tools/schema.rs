//! Tool descriptors derived from registered functions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::function::{Function, Parameter};
use super::param::ParamKind;

/// Tool definition sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Derive the descriptor for `function`. Deterministic: properties keep
    /// declaration order.
    pub fn from_function(function: &Function) -> Self {
        Self {
            name: function.name().to_string(),
            description: function.description().to_string(),
            parameters: parameters_schema(function.parameters()),
        }
    }
}

/// Build the `{type, properties, required}` object schema for a parameter
/// list. Context parameters are filled by the run loop and left out.
pub fn parameters_schema(parameters: &[Parameter]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in parameters {
        if param.kind == ParamKind::Context {
            continue;
        }
        properties.insert(param.name.clone(), param.kind.property(&param.description));
        if param.is_required() {
            required.push(Value::String(param.name.clone()));
        }
    }

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::param::ContextVariables;
    use serde_json::json;

    #[test]
    fn zero_parameter_function_has_empty_schema() {
        let f = Function::new("ping", [], || "pong");
        assert_eq!(
            f.descriptor().parameters,
            json!({"type": "object", "properties": {}, "required": []})
        );
        assert_eq!(f.descriptor().description, "");
    }

    #[test]
    fn context_parameters_are_hidden() {
        let f = Function::new("f", ["context_variables", "q"], |_: ContextVariables, q: String| q);
        let schema = f.descriptor().parameters;
        assert!(schema["properties"].get("context_variables").is_none());
        assert_eq!(schema["required"], json!(["q"]));
    }
}
