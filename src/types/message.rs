//! Chat message format shared by requests and conversation history.

use super::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};

/// Unified message structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    /// Invocations requested by an assistant turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Invocation answered by a `tool` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(MessageRole::Assistant, text)
    }

    /// Assistant turn that requested tool invocations (content may be absent).
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    pub fn tool_result(result: &ToolResult) -> Self {
        Self::tool(result.tool_call_id.clone(), result.content_text())
    }

    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_wire_shape() {
        let v = serde_json::to_value(Message::user("Hi")).unwrap();
        assert_eq!(v, json!({"role": "user", "content": "Hi"}));
    }

    #[test]
    fn tool_message_carries_call_id() {
        let v = serde_json::to_value(Message::tool("call_9", "18.5")).unwrap();
        assert_eq!(
            v,
            json!({"role": "tool", "content": "18.5", "tool_call_id": "call_9"})
        );
    }

    #[test]
    fn assistant_tool_turn_round_trips_from_wire() {
        let wire = json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"latitude\":1.0,\"longitude\":2.0}"}
            }]
        });
        let msg: Message = serde_json::from_value(wire).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.content.is_none());
        assert!(msg.has_tool_calls());
        assert_eq!(msg.tool_calls[0].arguments["longitude"], json!(2.0));
    }
}
