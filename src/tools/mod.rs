//! Tool system: host functions, parameter schemas, dispatch outcomes.

pub mod choice;
pub mod function;
pub mod output;
pub mod param;
pub mod schema;

pub use choice::ToolChoice;
pub use function::{ArgumentCursor, Function, IntoFunction, Parameter};
pub use output::{IntoToolOutput, ToolOutput, ToolResult};
pub use param::{ContextVariables, Json, ParamKind, ToolParam};
pub use schema::ToolDescriptor;
