//! Agent handoff example: an orchestrator transfers the conversation to a
//! code generation agent.

use agentforge::prelude::*;

fn code_gen_agent() -> Agent {
    Agent::new("Code Gen Agent").with_instructions(
        "You are a code generating assistant. Generate code based on the user's input.",
    )
}

#[tokio::main]
async fn main() -> agentforge::error::Result<()> {
    let forge = Forge::from_config(&ForgeConfig::load()?)?;

    let orchestrator = Agent::new("Orchestrator")
        .with_instructions("You are the orchestrator agent. Mention this in every answer.")
        .with_function(
            Function::new("transfer_to_code_gen_agent", [], code_gen_agent)
                .with_description("Hand the conversation to the code generation agent"),
        );

    let response = forge
        .run(
            orchestrator,
            &[Message::user("Can you generate Hello World in Rust?")],
            RunOptions::default(),
        )
        .await?;

    println!("[{}] {}", response.agent.name(), response.text().unwrap_or_default());
    println!("Messages: {}", response.messages.len());
    Ok(())
}
