//! Prompt chaining example
//!
//! Extract -> gate on confidence -> parse details -> confirm.
//! The second input is not a calendar event and stops at the gate.
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example prompt_chaining

use llm_patterns::workflows::CalendarChain;
use llm_patterns::{CompletionClient, WorkflowOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CompletionClient::from_env()?;
    let chain = CalendarChain::new(client);

    for input in [
        "Let's schedule a 1h team meeting next Tuesday at 2pm with Alice and Bob to discuss the project roadmap.",
        "Can you send an email to Alice and Bob to discuss the project roadmap?",
    ] {
        println!("> {input}");
        match chain.process(input).await? {
            WorkflowOutcome::Completed(confirmation) => {
                println!("{}", confirmation.confirmation_message);
                if let Some(link) = confirmation.calendar_link {
                    println!("Calendar link: {link}");
                }
            }
            WorkflowOutcome::Declined(reason) => println!("Gate check failed: {reason}"),
        }
        println!();
    }

    Ok(())
}
