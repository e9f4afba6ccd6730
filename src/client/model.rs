use super::request::CompletionRequest;
use super::response::{CompletionResult, ModelReply};
use crate::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// A chat-completion endpoint.
///
/// [`CompletionClient`](super::CompletionClient) talks HTTP; tests and alternative
/// backends implement this directly. Every workflow is written against this trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit one request and wait for the assistant turn.
    async fn send(&self, request: &CompletionRequest) -> Result<ModelReply>;
}

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for std::sync::Arc<M> {
    async fn send(&self, request: &CompletionRequest) -> Result<ModelReply> {
        (**self).send(request).await
    }
}

/// Typed helpers over [`ChatModel::send`].
#[async_trait]
pub trait CompletionExt: ChatModel {
    /// Send `request` and interpret the reply (see [`CompletionResult::from_reply`]).
    async fn complete<T>(&self, request: &CompletionRequest) -> Result<CompletionResult<T>>
    where
        T: DeserializeOwned + Send,
    {
        let reply = self.send(request).await?;
        Ok(CompletionResult::from_reply(request, &reply))
    }

    /// Send `request` and return the assistant text, if any.
    async fn complete_text(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let reply = self.send(request).await?;
        Ok(reply.content().map(str::to_string))
    }

    /// Request output in the strict schema of `T` and decode it.
    ///
    /// `Ok(None)` means the model answered but produced no conforming object
    /// (mismatch, refusal, or unexpected tool invocations).
    async fn parse<T>(&self, request: &CompletionRequest) -> Result<Option<T>>
    where
        T: DeserializeOwned + JsonSchema + Send,
    {
        let request = match request.response_format {
            Some(_) => request.clone(),
            None => request.clone().structured::<T>(),
        };
        Ok(self.complete::<T>(&request).await?.into_parsed())
    }
}

impl<M: ChatModel + ?Sized> CompletionExt for M {}
