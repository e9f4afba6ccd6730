//! Core data types: messages, conversation history and tool calling.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role, text and tool linkage |
//! | [`MessageRole`] | Message role (system, user, assistant, tool) |
//! | [`Conversation`] | Ordered history that keeps tool answers next to their request |
//! | [`ToolDefinition`] | Function declaration offered to the model |
//! | [`ToolCall`] | Invocation requested by the model |
//! | [`ToolResult`] | Local result of an invocation |
//!
//! ## Example
//!
//! ```rust
//! use llm_patterns::types::{Message, ToolDefinition};
//!
//! let system = Message::system("You are a weather assistant");
//! let user = Message::user("What is the weather like in Paris today?");
//!
//! let tool = ToolDefinition::function(
//!     "get_weather",
//!     "Get current temperature for provided coordinates in celsius.",
//!     serde_json::json!({
//!         "type": "object",
//!         "properties": {
//!             "latitude": {"type": "number"},
//!             "longitude": {"type": "number"}
//!         },
//!         "required": ["latitude", "longitude"],
//!         "additionalProperties": false
//!     }),
//! )
//! .strict(true);
//! assert_eq!(tool.name(), "get_weather");
//! ```

pub mod conversation;
pub mod message;
pub mod tool;

pub use conversation::Conversation;
pub use message::{Message, MessageRole};
pub use tool::{FunctionDefinition, ToolCall, ToolDefinition, ToolResult};
