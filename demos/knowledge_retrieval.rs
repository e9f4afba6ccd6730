//! Retrieval example: answering from a small knowledge base
//!
//! The model can search the knowledge base or fall back to a canned reply for
//! off-topic questions. Answers carry the id of the record they came from.
//!
//! Usage:
//!   OPENAI_API_KEY="your_key" cargo run --example knowledge_retrieval

use llm_patterns::tools::KnowledgeBase;
use llm_patterns::workflows::{InquiryResponse, ToolAssistant};
use llm_patterns::{CompletionClient, WorkflowOutcome};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn store_faq() -> anyhow::Result<KnowledgeBase> {
    let records = json!({
        "records": [
            {"id": 1, "question": "What is the return policy?",
             "answer": "Items can be returned within 30 days of purchase with original receipt. Refunds will be processed to the original payment method within 5-7 business days."},
            {"id": 2, "question": "Do you ship internationally?",
             "answer": "Yes, we ship to over 50 countries worldwide. International shipping typically takes 7-14 business days and costs vary by destination."},
            {"id": 3, "question": "What payment methods do you accept?",
             "answer": "We accept Visa, Mastercard, American Express, PayPal, and Apple Pay. All payments are processed securely through our encrypted payment system."}
        ]
    });
    Ok(KnowledgeBase::from_value(records)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CompletionClient::from_env()?;
    let assistant = ToolAssistant::knowledge(client, store_faq()?)?;

    for question in [
        "What is the return policy?",
        "What is the current weather in Tokyo?",
    ] {
        println!("Q: {question}");
        match assistant.answer::<InquiryResponse>(question).await? {
            WorkflowOutcome::Completed(reply) => {
                println!("A: {} (source: {})\n", reply.answer, reply.source)
            }
            WorkflowOutcome::Declined(reason) => println!("A: no answer ({reason})\n"),
        }
    }

    Ok(())
}
