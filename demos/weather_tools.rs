//! Tool calling example: current weather via Open-Meteo
//!
//! The model is offered a `get_weather` tool, the call is executed against the
//! public Open-Meteo API, and the final answer is returned as a typed object.
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example weather_tools
//!   RUST_LOG=llm_patterns=debug cargo run --example weather_tools -- "What's the weather like in Tokyo?"

use llm_patterns::workflows::{ToolAssistant, WeatherResponse};
use llm_patterns::{CompletionClient, WorkflowOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What is the weather like in Paris today?".to_string());

    let client = CompletionClient::from_env()?;
    let assistant = ToolAssistant::weather(client)?;

    match assistant.answer::<WeatherResponse>(&question).await? {
        WorkflowOutcome::Completed(answer) => {
            println!("Temperature: {:.1}°C", answer.temperature);
            println!("{}", answer.response);
        }
        WorkflowOutcome::Declined(reason) => println!("No answer: {reason}"),
    }

    Ok(())
}
