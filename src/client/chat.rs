use super::model::{ChatModel, CompletionExt};
use super::request::CompletionRequest;
use super::response::{CompletionResult, ModelReply};
use crate::structured::ResponseFormat;
use crate::types::{Message, ToolDefinition};
use crate::Result;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Fluent builder for a single chat request against a [`ChatModel`].
pub struct ChatRequestBuilder<'a, M: ChatModel + ?Sized> {
    pub(crate) model: &'a M,
    pub(crate) request: CompletionRequest,
}

impl<'a, M: ChatModel + ?Sized> ChatRequestBuilder<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            request: CompletionRequest::default(),
        }
    }

    /// Replace the message history.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.request.messages.push(Message::system(text));
        self
    }

    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.request.messages.push(Message::user(text));
        self
    }

    /// Use a model other than the client default.
    pub fn model_id(mut self, model: impl Into<String>) -> Self {
        self.request.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.request.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.request.max_tokens = Some(max);
        self
    }

    /// Set tools for function calling.
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = tools;
        self
    }

    pub fn tool_choice(mut self, tool_choice: serde_json::Value) -> Self {
        self.request.tool_choice = Some(tool_choice);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.request.response_format = Some(format);
        self
    }

    pub fn into_request(self) -> CompletionRequest {
        self.request
    }

    /// Execute and return the raw assistant turn.
    pub async fn send(self) -> Result<ModelReply> {
        self.model.send(&self.request).await
    }

    /// Execute and return the assistant text.
    pub async fn text(self) -> Result<Option<String>> {
        self.model.complete_text(&self.request).await
    }

    /// Execute and interpret the reply as `T`.
    pub async fn complete<T>(self) -> Result<CompletionResult<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.model.complete::<T>(&self.request).await
    }

    /// Execute with `T`'s strict schema as the response format and decode it.
    pub async fn parse<T>(self) -> Result<Option<T>>
    where
        T: DeserializeOwned + JsonSchema + Send,
    {
        self.model.parse::<T>(&self.request).await
    }
}
