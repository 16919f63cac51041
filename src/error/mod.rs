//! Error types for agentforge.

use thiserror::Error;

/// Primary error type for all agentforge operations.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required argument '{parameter}' for tool {function}")]
    MissingArgument { function: String, parameter: String },

    #[error("Invalid argument '{parameter}' for tool {function}: {message}")]
    InvalidArgument {
        function: String,
        parameter: String,
        message: String,
    },

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Broad error category, separating backend failures from tool failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Backend,
    Configuration,
    Arguments,
    ToolExecution,
    Serialization,
    Unknown,
}

impl ForgeError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Api { .. }
            | Self::RateLimited { .. }
            | Self::Network(_)
            | Self::Authentication(_) => ErrorCategory::Backend,
            Self::Configuration(_) | Self::Io(_) => ErrorCategory::Configuration,
            Self::MissingArgument { .. } | Self::InvalidArgument { .. } => ErrorCategory::Arguments,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidState(_) => ErrorCategory::Unknown,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_argument_names_the_parameter() {
        let err = ForgeError::MissingArgument {
            function: "add".into(),
            parameter: "b".into(),
        };
        assert_eq!(err.to_string(), "Missing required argument 'b' for tool add");
        assert_eq!(err.category(), ErrorCategory::Arguments);
    }

    #[test]
    fn status_errors_are_backend_failures() {
        assert_eq!(ForgeError::api(500, "boom").category(), ErrorCategory::Backend);
        assert_eq!(
            ForgeError::RateLimited { retry_after_ms: None }.category(),
            ErrorCategory::Backend
        );
    }
}
