//! Tool-choice policy tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use strum::EnumString;

/// How the model may use the advertised tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides freely.
    #[default]
    Auto,
    /// The model must not call tools.
    None,
    /// The model must call some tool.
    Required,
    /// The model must call this specific function.
    #[strum(default)]
    Function(String),
}

impl ToolChoice {
    /// Resolve a policy token. Any token other than `auto`, `none` or
    /// `required` names a function; it is not checked against any registry.
    pub fn resolve(token: &str) -> Self {
        Self::from_str(token).unwrap_or_else(|_| Self::Function(token.to_string()))
    }

    /// OpenAI wire representation.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Self::Function(name) => serde_json::json!({
                "type": "function",
                "function": { "name": name },
            }),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::None => f.write_str("none"),
            Self::Required => f.write_str("required"),
            Self::Function(name) => f.write_str(name),
        }
    }
}

impl Serialize for ToolChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_the_three_keywords() {
        assert_eq!(ToolChoice::resolve("auto"), ToolChoice::Auto);
        assert_eq!(ToolChoice::resolve("none"), ToolChoice::None);
        assert_eq!(ToolChoice::resolve("required"), ToolChoice::Required);
    }

    #[test]
    fn any_other_token_is_a_function_name() {
        assert_eq!(
            ToolChoice::resolve("any_function"),
            ToolChoice::Function("any_function".into())
        );
        assert_eq!(
            ToolChoice::resolve("any_function").to_wire(),
            json!({"type": "function", "function": {"name": "any_function"}})
        );
        assert_eq!(ToolChoice::Required.to_wire(), json!("required"));
    }
}
