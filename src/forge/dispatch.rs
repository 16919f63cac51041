//! Tool-call dispatch: resolve, coerce, invoke, classify.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::agent::Agent;
use crate::error::{ForgeError, Result};
use crate::types::{Message, ToolCall};

/// Messages and side effects produced by one batch of tool calls.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// One tool message per request, in request order.
    pub messages: Vec<Message>,
    /// Last handoff requested in the batch.
    pub agent: Option<Arc<Agent>>,
    pub context_variables: HashMap<String, String>,
}

/// Run `tool_calls` sequentially against `agent`'s registry.
///
/// Unknown tools are reported to the model and skipped. Argument errors,
/// tool errors and unserializable results abort the batch.
pub fn handle_tool_calls(
    tool_calls: &[ToolCall],
    agent: &Agent,
    context_variables: &HashMap<String, String>,
) -> Result<DispatchOutcome> {
    let mut outcome = DispatchOutcome::default();

    for call in tool_calls {
        let Some(function) = agent.function(&call.name) else {
            warn!(tool = %call.name, agent = agent.name(), "tool not found");
            outcome.messages.push(Message::tool(
                &call.id,
                format!("Error: Tool {} not found.", call.name),
            ));
            continue;
        };

        debug!(tool = %call.name, call_id = %call.id, "invoking tool");
        let output = match function.invoke(&call.arguments, context_variables) {
            Ok(output) => output,
            Err(err @ ForgeError::Serialization(_)) => {
                error!(tool = %call.name, error = %err, "tool returned a value that cannot be serialized");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let result = output.into_result();
        outcome.messages.push(Message::tool(&call.id, result.value));
        outcome.context_variables.extend(result.context_variables);
        if let Some(next) = result.agent {
            outcome.agent = Some(next);
        }
    }

    Ok(outcome)
}
