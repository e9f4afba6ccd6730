use crate::structured::ResponseFormat;
use crate::types::conversation::check_submittable;
use crate::types::{Conversation, Message, ToolDefinition};
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Value};
use std::collections::HashSet;

/// One chat-completion request: model, history, optional tools and output format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    /// Overrides the client's default model when set.
    pub model: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<Value>,
    pub response_format: Option<ResponseFormat>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self::new(conversation.messages().to_vec())
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set tool_choice (OpenAI-style, e.g. `"auto"`, `"required"`).
    pub fn tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Request output conforming to the strict schema of `T`.
    pub fn structured<T: schemars::JsonSchema>(self) -> Self {
        self.response_format(ResponseFormat::for_type::<T>())
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Reject requests the endpoint would refuse or that break the history invariant.
    pub fn validate(&self) -> Result<()> {
        if self.messages.is_empty() {
            return Err(Error::validation_with_context(
                "request must contain at least one message",
                ErrorContext::new().with_field_path("messages"),
            ));
        }

        check_submittable(&self.messages)?;

        let mut names = HashSet::new();
        for (idx, tool) in self.tools.iter().enumerate() {
            if tool.name().trim().is_empty() {
                return Err(Error::validation_with_context(
                    "tool name must be non-empty",
                    ErrorContext::new().with_field_path(format!("tools[{}].function.name", idx)),
                ));
            }
            if !names.insert(tool.name()) {
                return Err(Error::validation_with_context(
                    format!("tool '{}' is declared more than once", tool.name()),
                    ErrorContext::new().with_field_path(format!("tools[{}]", idx)),
                ));
            }
        }

        if self.tool_choice.is_some() && self.tools.is_empty() {
            return Err(Error::validation_with_context(
                "tool_choice requires at least one tool",
                ErrorContext::new().with_field_path("tool_choice"),
            ));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::validation_with_context(
                    format!("temperature {} is outside 0.0..=2.0", t),
                    ErrorContext::new().with_field_path("temperature"),
                ));
            }
        }

        Ok(())
    }

    /// Compile into the `/chat/completions` request body.
    pub fn to_body(&self, default_model: &str) -> Result<Value> {
        let model = self.model.as_deref().unwrap_or(default_model);
        let mut body = json!({
            "model": model,
            "messages": serde_json::to_value(&self.messages)?,
        });

        if !self.tools.is_empty() {
            body["tools"] = serde_json::to_value(&self.tools)?;
        }
        if let Some(choice) = &self.tool_choice {
            body["tool_choice"] = choice.clone();
        }
        if let Some(format) = &self.response_format {
            body["response_format"] = format.to_openai_format();
        }
        if let Some(t) = self.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(m) = self.max_tokens {
            body["max_tokens"] = json!(m);
        }

        Ok(body)
    }
}
