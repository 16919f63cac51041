//! Convenience re-exports for common use.

pub use crate::agent::{Agent, OutputSpec};
pub use crate::backend::{ChatBackend, Completion, CompletionOptions};
pub use crate::config::ForgeConfig;
pub use crate::error::{ForgeError, Result};
pub use crate::forge::{Forge, Response, RunOptions};
pub use crate::tool_enum;
pub use crate::tools::{
    ContextVariables, Function, Json, ToolChoice, ToolDescriptor, ToolOutput, ToolResult,
};
pub use crate::types::{Message, Role, ToolCall};
