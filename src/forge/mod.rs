//! The run loop: drives a conversation between agents, the backend and
//! registered tools.

pub mod dispatch;

use std::collections::HashMap;
use std::sync::Arc;

use bon::Builder;
use tracing::debug;
use uuid::Uuid;

use crate::agent::Agent;
use crate::backend::{ChatBackend, Completion, CompletionOptions};
use crate::config::ForgeConfig;
use crate::error::Result;
use crate::types::Message;

pub use dispatch::{handle_tool_calls, DispatchOutcome};

/// Unique run identifier.
pub type RunId = Uuid;

/// Per-run knobs.
#[derive(Debug, Clone, Builder)]
pub struct RunOptions {
    /// Model used instead of the active agent's model. Empty means unset.
    #[builder(into)]
    pub model_override: Option<String>,
    /// Maximum number of history entries the run may append.
    #[builder(default = usize::MAX)]
    pub max_turns: usize,
    /// When false, the first completion ends the run even if it asks for
    /// tools.
    #[builder(default = true)]
    pub execute_tools: bool,
    #[builder(default)]
    pub context_variables: HashMap<String, String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Output of a run.
#[derive(Debug, Clone)]
pub struct Response {
    pub run_id: RunId,
    /// Messages produced during the run, without the caller's prefix.
    pub messages: Vec<Message>,
    /// Agent active when the run ended.
    pub agent: Arc<Agent>,
    pub context_variables: HashMap<String, String>,
}

impl Response {
    /// Content of the last produced message.
    pub fn text(&self) -> Option<&str> {
        self.messages.last().map(Message::text)
    }
}

/// Orchestrator holding the chat backend.
///
/// Stores no per-run state: clone it freely and run independent
/// conversations concurrently.
#[derive(Clone)]
pub struct Forge {
    backend: Arc<dyn ChatBackend>,
}

impl Forge {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Build the backend described by `config`.
    pub fn from_config(config: &ForgeConfig) -> Result<Self> {
        Ok(Self::new(config.create_backend()?))
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Advance the conversation starting from `agent` until the model gives
    /// a plain answer or `max_turns` entries have been appended.
    pub async fn run(
        &self,
        agent: impl Into<Arc<Agent>>,
        messages: &[Message],
        options: RunOptions,
    ) -> Result<Response> {
        let run_id = Uuid::new_v4();
        let mut active_agent: Arc<Agent> = agent.into();
        let mut context_variables = options.context_variables;
        let model_override = options.model_override.filter(|m| !m.is_empty());
        let mut history = messages.to_vec();
        let init_len = history.len();

        while history.len() - init_len < options.max_turns {
            let appended = history.len() - init_len;
            debug!(
                run_id = %run_id,
                turn = appended,
                agent = active_agent.name(),
                "requesting completion"
            );
            let completion = self
                .get_chat_completion(&active_agent, &history, model_override.as_deref())
                .await?;

            let remaining = options.max_turns - appended;
            if completion.tool_calls.is_empty()
                || !options.execute_tools
                || remaining < completion.tool_calls.len() + 1
            {
                if options.execute_tools && !completion.tool_calls.is_empty() {
                    debug!(
                        run_id = %run_id,
                        dropped = completion.tool_calls.len(),
                        "turn budget exhausted before tool dispatch"
                    );
                }
                history.push(Message::assistant(completion.text.unwrap_or_default()));
                break;
            }

            let outcome =
                handle_tool_calls(&completion.tool_calls, &active_agent, &context_variables)?;
            history.push(Message::assistant_tool_calls(completion.tool_calls));
            history.extend(outcome.messages);
            context_variables.extend(outcome.context_variables);

            if let Some(next) = outcome.agent {
                debug!(
                    run_id = %run_id,
                    from = active_agent.name(),
                    to = next.name(),
                    "agent handoff"
                );
                active_agent = next;
            }
        }

        Ok(Response {
            run_id,
            messages: history.split_off(init_len),
            agent: active_agent,
            context_variables,
        })
    }

    async fn get_chat_completion(
        &self,
        agent: &Agent,
        history: &[Message],
        model_override: Option<&str>,
    ) -> Result<Completion> {
        let options = completion_options(agent);

        let mut messages = Vec::with_capacity(history.len() + 1);
        if !agent.instructions().is_empty() {
            messages.push(Message::system(agent.instructions()));
        }
        messages.extend_from_slice(history);

        let model = model_override.unwrap_or(agent.model());
        debug!(
            backend = self.backend.backend_name(),
            model,
            tools = options.tools.len(),
            "complete_chat"
        );
        self.backend.complete_chat(model, &messages, &options).await
    }
}

/// Tool choice and the parallel flag are only sent when the agent has
/// tools, so a tool-less agent is never forced to call one.
pub fn completion_options(agent: &Agent) -> CompletionOptions {
    let tools = agent.tool_descriptors();
    let (tool_choice, parallel_tool_calls) = if tools.is_empty() {
        (None, None)
    } else {
        (Some(agent.tool_choice()), Some(agent.parallel_tool_calls()))
    };
    CompletionOptions {
        tools,
        tool_choice,
        parallel_tool_calls,
        response_format: agent.output_spec().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Function, ToolChoice};

    #[test]
    fn tool_less_agent_sends_no_choice() {
        let options = completion_options(&Agent::new("plain").with_tool_choice("required"));
        assert!(options.tools.is_empty());
        assert_eq!(options.tool_choice, None);
        assert_eq!(options.parallel_tool_calls, None);
    }

    #[test]
    fn agent_with_tools_sends_choice_and_parallel_flag() {
        let agent = Agent::new("calc")
            .with_function(Function::new("add", ["a", "b"], |a: i64, b: i64| a + b))
            .with_tool_choice("add")
            .with_parallel_tool_calls(true);
        let options = completion_options(&agent);
        assert_eq!(options.tools.len(), 1);
        assert_eq!(options.tool_choice, Some(ToolChoice::Function("add".into())));
        assert_eq!(options.parallel_tool_calls, Some(true));
    }

    #[test]
    fn run_options_default_is_unbounded() {
        let options = RunOptions::default();
        assert_eq!(options.max_turns, usize::MAX);
        assert!(options.execute_tools);
        assert!(options.model_override.is_none());
    }
}
