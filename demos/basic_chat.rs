//! Basic chat example
//!
//! Sends a system and a user message and prints the plain-text reply.
//!
//! The API key is read from `OPENAI_API_KEY` (or the OS keyring).
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example basic_chat

use llm_patterns::{CompletionClient, CompletionExt, CompletionRequest, Message};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CompletionClient::from_env()?;

    let request = CompletionRequest::new(vec![
        Message::system(
            "You are a poetic assistant, skilled in explaining complex programming concepts with creative flair.",
        ),
        Message::user("Compose a poem that explains the concept of recursion in programming."),
    ]);

    match client.complete_text(&request).await? {
        Some(poem) => println!("{poem}"),
        None => println!("(the model returned no text)"),
    }

    Ok(())
}
