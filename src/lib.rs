//! # llm-patterns
//!
//! Typed building blocks for tool-augmented, structured chat completions against an
//! OpenAI-compatible endpoint, plus the workflows composed from them.
//!
//! ## Overview
//!
//! One request/response contract carries everything: an ordered message history,
//! optional tool declarations and an optional output schema go out; plain text, a
//! schema-conforming object, or a list of tool invocations come back. Invocations are
//! executed locally and answered in the history before it is submitted again.
//!
//! - **Completion**: [`CompletionClient`] over HTTP, [`ChatModel`] as the seam,
//!   [`CompletionExt`] for typed results
//! - **Structured output**: strict JSON schemas derived from Rust types, validated
//!   with `jsonschema` before decoding; a non-conforming reply never yields a value
//! - **Tools**: [`tools::ToolRegistry`] with `get_weather`, `search_knowledge` and
//!   `fallback_answer` built in
//! - **Workflows**: tool-assisted answers, prompt chaining and routing with
//!   confidence gates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_patterns::{CompletionClient, CompletionExt, CompletionRequest, Message};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, JsonSchema)]
//! struct CalendarEvent {
//!     name: String,
//!     date: String,
//!     participants: Vec<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> llm_patterns::Result<()> {
//!     let client = CompletionClient::from_env()?;
//!
//!     let request = CompletionRequest::new(vec![
//!         Message::system("You are a calendar assistant, skilled in creating calendar events."),
//!         Message::user("Create a calendar event for the meeting with John and Jane on 2025-04-22, Tuesday."),
//!     ]);
//!
//!     let event: Option<CalendarEvent> = client.parse(&request).await?;
//!     println!("{:?}", event);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Completion client, request/response types and the [`ChatModel`] trait |
//! | [`config`] | Endpoint, model and credential configuration |
//! | [`structured`] | Response formats, schema generation and validation |
//! | [`tools`] | Tool trait, registry and built-in tools |
//! | [`transport`] | JSON-over-HTTP transport |
//! | [`types`] | Messages, conversation history and tool calling types |
//! | [`workflows`] | Multi-call workflows with confidence gates |

pub mod client;
pub mod config;
pub mod structured;
pub mod tools;
pub mod transport;
pub mod types;
pub mod workflows;

// Re-export main types for convenience
pub use client::{
    ChatModel, CompletionClient, CompletionClientBuilder, CompletionExt, CompletionRequest,
    CompletionResult, ModelReply,
};
pub use config::ClientConfig;
pub use types::{
    conversation::Conversation,
    message::{Message, MessageRole},
    tool::{ToolCall, ToolDefinition, ToolResult},
};
pub use workflows::{DeclineReason, WorkflowOutcome};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
