//! Shared fixtures: a mockito endpoint and a scripted in-process model.

#![allow(dead_code)]

use async_trait::async_trait;
use llm_patterns::client::{ChatModel, CompletionRequest, ModelReply};
use llm_patterns::types::ToolCall;
use llm_patterns::{ClientConfig, CompletionClient, Error};
use mockito::{Server, ServerGuard};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const TEST_API_KEY: &str = "sk-test";

/// Test fixture that manages a mock chat-completions server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server.
    pub fn client(&self) -> CompletionClient {
        CompletionClient::builder()
            .config(ClientConfig::default())
            .base_url(&self.base_url)
            .api_key(TEST_API_KEY)
            .build()
            .expect("client builds against mock server")
    }
}

/// `/chat/completions` body with a plain assistant message.
pub fn text_completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content, "refusal": null},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30}
    })
    .to_string()
}

/// `/chat/completions` body requesting one invocation.
pub fn tool_call_completion(id: &str, name: &str, arguments: Value) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": {"name": name, "arguments": arguments.to_string()}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
    .to_string()
}

/// A [`ChatModel`] that replays canned replies and records every request it sees.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies whose content is each value serialized as JSON.
    pub fn json(values: Vec<Value>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| ModelReply::text(v.to_string()))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn send(&self, request: &CompletionRequest) -> llm_patterns::Result<ModelReply> {
        request.validate()?;
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::malformed("scripted model has no reply left"))
    }
}

pub fn tool_reply(id: &str, name: &str, arguments: Value) -> ModelReply {
    ModelReply::tool_calls(vec![ToolCall::new(id, name, arguments)])
}

pub fn response_format_name(request: &CompletionRequest) -> Option<String> {
    request
        .response_format
        .as_ref()
        .and_then(|f| f.name())
        .map(str::to_string)
}
