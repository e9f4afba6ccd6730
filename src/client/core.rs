use super::model::ChatModel;
use super::request::CompletionRequest;
use super::response::ModelReply;
use crate::config::ClientConfig;
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Requests are awaited one at a time by callers; the client keeps no per-request state.
pub struct CompletionClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<HttpTransport>,
}

impl CompletionClient {
    /// Build a client from environment variables and the keyring.
    pub fn from_env() -> Result<Self> {
        super::builder::CompletionClientBuilder::new().build()
    }

    pub fn builder() -> super::builder::CompletionClientBuilder {
        super::builder::CompletionClientBuilder::new()
    }

    /// Default model used when a request does not name one.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a fluent chat request against this client.
    pub fn chat(&self) -> super::chat::ChatRequestBuilder<'_, Self> {
        super::chat::ChatRequestBuilder::new(self)
    }
}

#[async_trait]
impl ChatModel for CompletionClient {
    async fn send(&self, request: &CompletionRequest) -> Result<ModelReply> {
        request.validate()?;
        let body = request.to_body(&self.config.model)?;
        let request_id = Uuid::new_v4().to_string();

        info!(
            request_id = %request_id,
            model = body["model"].as_str().unwrap_or_default(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            structured = request.response_format.is_some(),
            "sending completion request"
        );

        let value = self
            .transport
            .post_json(CHAT_COMPLETIONS_PATH, &body, Some(&request_id))
            .await?;
        let reply = ModelReply::from_value(value)?;

        debug!(
            request_id = %request_id,
            finish_reason = reply.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = reply.tool_calls_requested().len(),
            total_tokens = reply.usage.map(|u| u.total_tokens).unwrap_or(0),
            "completion received"
        );
        Ok(reply)
    }
}
