//! Routing example
//!
//! Classifies each request as a new event, a modification, or something else,
//! and dispatches to the matching handler.
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example calendar_routing

use llm_patterns::workflows::CalendarRouter;
use llm_patterns::{CompletionClient, WorkflowOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CompletionClient::from_env()?;
    let router = CalendarRouter::new(client);

    for input in [
        "Let's schedule a team meeting next Tuesday at 2pm with Alice and Bob",
        "Can you move the team meeting with Alice and Bob to Wednesday at 3pm instead?",
        "What's the weather like today?",
    ] {
        println!("> {input}");
        match router.process(input).await? {
            WorkflowOutcome::Completed(response) => println!("{}", response.message),
            WorkflowOutcome::Declined(reason) => println!("Request not supported: {reason}"),
        }
        println!();
    }

    Ok(())
}
