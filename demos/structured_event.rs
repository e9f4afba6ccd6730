//! Structured output example
//!
//! Asks the model for a calendar event that must conform to a derived JSON schema.
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example structured_event -- "Alice and Bob are going to a science fair on Friday."

use llm_patterns::workflows::create_calendar_event;
use llm_patterns::CompletionClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let request = std::env::args().nth(1).unwrap_or_else(|| {
        "Create a calendar event for the meeting with John and Jane on 2025-04-22, Tuesday."
            .to_string()
    });

    let client = CompletionClient::from_env()?;
    match create_calendar_event(&client, &request).await? {
        Some(event) => {
            println!("Name:         {}", event.name);
            println!("Date:         {}", event.date);
            println!("Participants: {}", event.participants.join(", "));
        }
        None => println!("The model did not produce a conforming event."),
    }

    Ok(())
}
