//! Core Agent struct.

use std::fmt;

use tracing::warn;

use super::output_spec::OutputSpec;
use crate::tools::{Function, ToolChoice, ToolDescriptor};

const DEFAULT_INSTRUCTIONS: &str = "You are a helpful agent.";
const DEFAULT_MODEL: &str = "gpt-4o";

/// A named agent: instructions, target model and the tools it may call.
///
/// Agents are built by value and shared as `Arc<Agent>` once a run starts.
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    model: String,
    tools: Vec<Function>,
    tool_choice: String,
    parallel_tool_calls: bool,
    output_spec: Option<OutputSpec>,
}

impl Agent {
    /// Create an agent with default instructions, model and tool policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            model: DEFAULT_MODEL.to_string(),
            tools: Vec::new(),
            tool_choice: "auto".to_string(),
            parallel_tool_calls: false,
            output_spec: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the tool-choice policy token (`auto`, `none`, `required`, or a
    /// function name).
    pub fn with_tool_choice(mut self, token: impl Into<String>) -> Self {
        self.tool_choice = token.into();
        self
    }

    pub fn with_parallel_tool_calls(mut self, allow: bool) -> Self {
        self.parallel_tool_calls = allow;
        self
    }

    pub fn with_output_spec(mut self, spec: OutputSpec) -> Self {
        self.output_spec = Some(spec);
        self
    }

    /// Add a tool.
    pub fn with_function(mut self, function: Function) -> Self {
        self.add_function(function);
        self
    }

    /// Register a tool. A function with the same name as an existing tool
    /// replaces it in place: the last registration wins.
    pub fn add_function(&mut self, function: Function) {
        match self.tools.iter_mut().find(|f| f.name() == function.name()) {
            Some(existing) => {
                warn!(
                    agent = %self.name,
                    tool = function.name(),
                    "replacing previously registered tool"
                );
                *existing = function;
            }
            None => self.tools.push(function),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn functions(&self) -> &[Function] {
        &self.tools
    }

    /// Look up a registered tool by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.tools.iter().find(|f| f.name() == name)
    }

    pub fn tool_choice(&self) -> ToolChoice {
        ToolChoice::resolve(&self.tool_choice)
    }

    pub fn parallel_tool_calls(&self) -> bool {
        self.parallel_tool_calls
    }

    pub fn output_spec(&self) -> Option<&OutputSpec> {
        self.output_spec.as_ref()
    }

    /// Descriptors for every registered tool, in registration order.
    pub fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(Function::descriptor).collect()
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field(
                "tools",
                &self.tools.iter().map(Function::name).collect::<Vec<_>>(),
            )
            .field("tool_choice", &self.tool_choice)
            .field("parallel_tool_calls", &self.parallel_tool_calls)
            .finish()
    }
}
