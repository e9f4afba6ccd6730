//! Ordered conversation history.
//!
//! A `tool` message must answer an invocation of the assistant turn directly before it
//! (possibly after other `tool` messages answering the same turn). Nothing else may be
//! appended, and nothing may be submitted, while that turn has unanswered invocations.

use super::message::{Message, MessageRole};
use super::tool::{ToolCall, ToolResult};
use crate::{Error, ErrorContext, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation opened with a system prompt followed by a user message.
    pub fn with_prompt(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
        }
    }

    /// Adopt an existing history, checking its ordering.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self> {
        check_order(&messages)?;
        Ok(Self { messages })
    }

    pub fn push(&mut self, message: Message) -> Result<()> {
        let index = self.messages.len();
        if message.role == MessageRole::Tool {
            check_tool_message(&self.messages, &message, index)?;
        } else {
            let pending = pending_in(&self.messages);
            if !pending.is_empty() {
                return Err(Error::conversation_order(
                    format!(
                        "cannot append a {} message while {} tool invocation(s) are unresolved",
                        message.role,
                        pending.len()
                    ),
                    ErrorContext::new()
                        .with_field_path(format!("messages[{}]", index))
                        .with_details(pending_ids(&pending)),
                ));
            }
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn push_system(&mut self, text: impl Into<String>) -> Result<()> {
        self.push(Message::system(text))
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Result<()> {
        self.push(Message::user(text))
    }

    pub fn push_tool_result(&mut self, result: &ToolResult) -> Result<()> {
        self.push(Message::tool_result(result))
    }

    /// Invocations of the latest assistant turn that have no `tool` answer yet.
    pub fn pending_tool_calls(&self) -> Vec<&ToolCall> {
        pending_in(&self.messages)
    }

    /// Fails when the history cannot be submitted because invocations are unresolved.
    pub fn ensure_resolved(&self) -> Result<()> {
        let pending = self.pending_tool_calls();
        if pending.is_empty() {
            Ok(())
        } else {
            Err(Error::conversation_order(
                "tool invocations must be resolved before the conversation is submitted",
                ErrorContext::new()
                    .with_details(pending_ids(&pending))
                    .with_source("conversation"),
            ))
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Verify a full message sequence: every `tool` message answers the assistant turn it
/// follows, and no non-tool message interrupts an unanswered turn.
///
/// A trailing unanswered turn is allowed here; see [`check_submittable`].
pub fn check_order(messages: &[Message]) -> Result<()> {
    let mut replay = Conversation::new();
    for message in messages {
        replay.push(message.clone())?;
    }
    Ok(())
}

/// [`check_order`] plus the requirement that nothing is left unanswered.
pub fn check_submittable(messages: &[Message]) -> Result<()> {
    check_order(messages)?;
    let pending = pending_in(messages);
    if pending.is_empty() {
        Ok(())
    } else {
        Err(Error::conversation_order(
            "tool invocations must be resolved before the conversation is submitted",
            ErrorContext::new()
                .with_details(pending_ids(&pending))
                .with_source("request"),
        ))
    }
}

/// Index of the assistant turn that the trailing run of `tool` messages belongs to.
fn open_turn(messages: &[Message]) -> Option<usize> {
    let idx = messages.iter().rposition(|m| m.role != MessageRole::Tool)?;
    let turn = &messages[idx];
    (turn.role == MessageRole::Assistant && turn.has_tool_calls()).then_some(idx)
}

fn pending_in(messages: &[Message]) -> Vec<&ToolCall> {
    let Some(idx) = open_turn(messages) else {
        return Vec::new();
    };
    let answered: Vec<&str> = messages[idx + 1..]
        .iter()
        .filter_map(|m| m.tool_call_id.as_deref())
        .collect();
    messages[idx]
        .tool_calls
        .iter()
        .filter(|c| !answered.contains(&c.id.as_str()))
        .collect()
}

fn check_tool_message(messages: &[Message], message: &Message, index: usize) -> Result<()> {
    let ctx = || ErrorContext::new().with_field_path(format!("messages[{}]", index));

    let id = message.tool_call_id.as_deref().ok_or_else(|| {
        Error::conversation_order("tool message is missing tool_call_id", ctx())
    })?;

    if open_turn(messages).is_none() {
        return Err(Error::conversation_order(
            "tool message does not follow an assistant turn that requested tools",
            ctx().with_details(id.to_string()),
        ));
    }

    if !pending_in(messages).iter().any(|c| c.id == id) {
        return Err(Error::conversation_order(
            "tool message answers no unresolved invocation of the preceding assistant turn",
            ctx().with_details(id.to_string()),
        ));
    }

    Ok(())
}

fn pending_ids(pending: &[&ToolCall]) -> String {
    pending
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_turn() -> Message {
        Message::assistant_tool_calls(
            None,
            vec![
                ToolCall::new("call_a", "get_weather", json!({"latitude": 1.0, "longitude": 2.0})),
                ToolCall::new("call_b", "get_weather", json!({"latitude": 3.0, "longitude": 4.0})),
            ],
        )
    }

    #[test]
    fn tool_messages_follow_their_assistant_turn() {
        let mut conv = Conversation::with_prompt("sys", "weather?");
        conv.push(weather_turn()).unwrap();
        assert_eq!(conv.pending_tool_calls().len(), 2);
        assert!(conv.ensure_resolved().is_err());

        conv.push(Message::tool("call_b", "12")).unwrap();
        conv.push(Message::tool("call_a", "10")).unwrap();
        assert!(conv.pending_tool_calls().is_empty());
        conv.ensure_resolved().unwrap();
        conv.push(Message::assistant("It is mild.")).unwrap();
    }

    #[test]
    fn tool_message_without_assistant_turn_is_rejected() {
        let mut conv = Conversation::with_prompt("sys", "hi");
        let err = conv.push(Message::tool("call_a", "x")).unwrap_err();
        assert!(matches!(err, Error::ConversationOrder { .. }));
    }

    #[test]
    fn unknown_or_duplicate_call_id_is_rejected() {
        let mut conv = Conversation::with_prompt("sys", "hi");
        conv.push(weather_turn()).unwrap();
        assert!(conv.push(Message::tool("call_z", "x")).is_err());

        conv.push(Message::tool("call_a", "x")).unwrap();
        assert!(conv.push(Message::tool("call_a", "again")).is_err());
    }

    #[test]
    fn other_messages_cannot_interrupt_pending_invocations() {
        let mut conv = Conversation::with_prompt("sys", "hi");
        conv.push(weather_turn()).unwrap();
        conv.push(Message::tool("call_a", "x")).unwrap();
        let err = conv.push_user("still there?").unwrap_err();
        assert!(err.to_string().contains("call_b"));
    }

    #[test]
    fn tool_message_after_a_later_user_turn_is_rejected() {
        let messages = vec![
            Message::user("hi"),
            Message::assistant_tool_calls(None, vec![ToolCall::new("c1", "t", json!({}))]),
            Message::tool("c1", "ok"),
            Message::user("and now?"),
            Message::tool("c1", "late"),
        ];
        assert!(check_order(&messages).is_err());
    }

    #[test]
    fn submittable_requires_resolution() {
        let mut messages = vec![
            Message::user("hi"),
            Message::assistant_tool_calls(None, vec![ToolCall::new("c1", "t", json!({}))]),
        ];
        check_order(&messages).unwrap();
        assert!(check_submittable(&messages).is_err());
        messages.push(Message::tool("c1", "ok"));
        check_submittable(&messages).unwrap();
    }
}
