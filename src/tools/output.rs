//! What a tool function hands back to the run loop.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::param::Json;
use crate::agent::Agent;
use crate::error::{ForgeError, Result};

/// Structured outcome of a tool call.
#[derive(Debug, Clone, Default)]
pub struct ToolResult {
    /// Text returned to the model as the tool response.
    pub value: String,
    /// Agent to hand the conversation to, if any.
    pub agent: Option<Arc<Agent>>,
    /// Context updates merged into the run after this call.
    pub context_variables: HashMap<String, String>,
}

impl ToolResult {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_agent(mut self, agent: impl Into<Arc<Agent>>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_variables.insert(key.into(), value.into());
        self
    }
}

/// Classified return value of a tool function.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    /// Plain data, serialized to JSON text for the model.
    Raw(Value),
    /// Control transfer to another agent.
    Handoff(Arc<Agent>),
    /// Already-shaped outcome, used verbatim.
    Structured(ToolResult),
}

impl ToolOutput {
    /// Turn the output into the result the dispatcher records.
    pub fn into_result(self) -> ToolResult {
        match self {
            Self::Structured(result) => result,
            Self::Handoff(agent) => ToolResult {
                value: serde_json::json!({ "assistant": agent.name() }).to_string(),
                agent: Some(agent),
                context_variables: HashMap::new(),
            },
            Self::Raw(value) => ToolResult::new(value.to_string()),
        }
    }
}

/// Conversion of a tool function's return type into a [`ToolOutput`].
pub trait IntoToolOutput {
    fn into_tool_output(self) -> Result<ToolOutput>;
}

impl IntoToolOutput for ToolOutput {
    fn into_tool_output(self) -> Result<ToolOutput> {
        Ok(self)
    }
}

impl IntoToolOutput for ToolResult {
    fn into_tool_output(self) -> Result<ToolOutput> {
        Ok(ToolOutput::Structured(self))
    }
}

impl IntoToolOutput for Agent {
    fn into_tool_output(self) -> Result<ToolOutput> {
        Ok(ToolOutput::Handoff(Arc::new(self)))
    }
}

impl IntoToolOutput for Arc<Agent> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        Ok(ToolOutput::Handoff(self))
    }
}

impl<T: IntoToolOutput> IntoToolOutput for std::result::Result<T, ForgeError> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        self?.into_tool_output()
    }
}

fn raw<T: Serialize + ?Sized>(value: &T) -> Result<ToolOutput> {
    Ok(ToolOutput::Raw(serde_json::to_value(value)?))
}

macro_rules! raw_output {
    ($($ty:ty),*) => {$(
        impl IntoToolOutput for $ty {
            fn into_tool_output(self) -> Result<ToolOutput> {
                raw(&self)
            }
        }
    )*};
}

raw_output!(
    (), bool, String, &str, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Value
);

impl<T: Serialize> IntoToolOutput for Vec<T> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        raw(&self)
    }
}

impl<T: Serialize> IntoToolOutput for Option<T> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        raw(&self)
    }
}

impl<K, V, S> IntoToolOutput for HashMap<K, V, S>
where
    K: Serialize + Eq + Hash,
    V: Serialize,
    S: BuildHasher,
{
    fn into_tool_output(self) -> Result<ToolOutput> {
        raw(&self)
    }
}

impl<K: Serialize + Ord, V: Serialize> IntoToolOutput for BTreeMap<K, V> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        raw(&self)
    }
}

impl<T: Serialize> IntoToolOutput for Json<T> {
    fn into_tool_output(self) -> Result<ToolOutput> {
        raw(&self.0)
    }
}
