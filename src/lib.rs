//! Multi-agent run loop for chat-completion models.
//!
//! Agents bundle instructions, a model and a registry of host functions.
//! [`forge::Forge`] drives the conversation: it asks the backend for a
//! completion, dispatches any tool calls to the registered functions, and
//! switches agents when a tool hands off control.
//!
//! # Quick Start
//!
//! ```no_run
//! use agentforge::prelude::*;
//!
//! # async fn example() -> agentforge::error::Result<()> {
//! let forge = Forge::from_config(&ForgeConfig::from_env())?;
//!
//! let agent = Agent::new("Calculator")
//!     .with_instructions("Use the tools to do arithmetic.")
//!     .with_function(Function::new("add", ["a", "b"], |a: i64, b: i64| a + b));
//!
//! let response = forge
//!     .run(agent, &[Message::user("What is 2 + 3?")], RunOptions::default())
//!     .await?;
//! println!("{}", response.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod backend;
pub mod config;
pub mod error;
pub mod forge;
pub mod prelude;
pub mod tools;
pub mod types;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
    pub use strum;
}
