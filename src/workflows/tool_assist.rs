//! Tool-assisted structured answers (weather lookup, knowledge-base retrieval).

use super::gate::{DeclineReason, WorkflowOutcome};
use crate::client::{ChatModel, CompletionRequest, CompletionResult};
use crate::tools::{
    FallbackAnswerTool, KnowledgeBase, SearchKnowledgeTool, ToolRegistry, WeatherTool,
};
use crate::types::Conversation;
use crate::Result;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const WEATHER_SYSTEM_PROMPT: &str = "You are a weather assistant, skilled in explaining weather information with exact information in real-time. \
You should give some more useful information about the weather in general, instead of only the exact information asked by user.";

pub const KNOWLEDGE_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the knowledge base for our e-commerce store. \
Use only the tools provided to answer";

const DEFAULT_MAX_TOOL_ROUNDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherResponse {
    /// The current temperature in celsius for the given location.
    pub temperature: f64,
    /// A natural language response to the user's question.
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InquiryResponse {
    /// The answer to user inquiry
    pub answer: String,
    /// The record id of the answer
    pub source: i64,
}

/// Answers a question with tools available, then asks for a structured final answer.
///
/// The first request declares the tools only. Requested invocations are resolved
/// into the conversation, which is re-submitted with the tools and `T`'s schema until
/// the model returns the answer or `max_tool_rounds` is exhausted.
pub struct ToolAssistant<M> {
    model: M,
    system_prompt: String,
    registry: ToolRegistry,
    model_id: Option<String>,
    max_tool_rounds: usize,
}

impl<M: ChatModel> ToolAssistant<M> {
    pub fn new(model: M, system_prompt: impl Into<String>, registry: ToolRegistry) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            registry,
            model_id: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Weather assistant with the public Open-Meteo `get_weather` tool.
    pub fn weather(model: M) -> Result<Self> {
        Self::weather_with_tool(model, WeatherTool::new()?)
    }

    pub fn weather_with_tool(model: M, tool: WeatherTool) -> Result<Self> {
        let registry = ToolRegistry::new().with(tool)?;
        Ok(Self::new(model, WEATHER_SYSTEM_PROMPT, registry))
    }

    /// Retrieval assistant over `kb` with `search_knowledge` and `fallback_answer`.
    pub fn knowledge(model: M, kb: KnowledgeBase) -> Result<Self> {
        let registry = ToolRegistry::new()
            .with(SearchKnowledgeTool::new(Arc::new(kb)))?
            .with(FallbackAnswerTool)?;
        Ok(Self::new(model, KNOWLEDGE_SYSTEM_PROMPT, registry))
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn request(&self, conversation: &Conversation) -> CompletionRequest {
        let mut request =
            CompletionRequest::from_conversation(conversation).tools(self.registry.definitions());
        request.model = self.model_id.clone();
        request
    }

    pub async fn answer<T>(&self, question: &str) -> Result<WorkflowOutcome<T>>
    where
        T: DeserializeOwned + JsonSchema + Send,
    {
        let mut conversation = Conversation::with_prompt(&self.system_prompt, question);

        let reply = self.model.send(&self.request(&conversation)).await?;
        if reply.has_tool_calls() {
            self.registry
                .resolve_tool_calls(&mut conversation, &reply)
                .await?;
        } else {
            info!("model answered without calling a tool");
        }

        for _ in 0..self.max_tool_rounds {
            let request = self.request(&conversation).structured::<T>();
            let reply = self.model.send(&request).await?;
            match CompletionResult::<T>::from_reply(&request, &reply) {
                CompletionResult::Structured(answer) => {
                    return Ok(WorkflowOutcome::Completed(answer))
                }
                CompletionResult::ToolCalls(_) => {
                    self.registry
                        .resolve_tool_calls(&mut conversation, &reply)
                        .await?;
                }
                _ => {
                    return Ok(WorkflowOutcome::Declined(DeclineReason::NoResult {
                        stage: "answer",
                    }))
                }
            }
        }

        warn!(
            rounds = self.max_tool_rounds,
            "model kept requesting tools without answering"
        );
        Ok(WorkflowOutcome::Declined(DeclineReason::NoResult {
            stage: "answer",
        }))
    }
}
