//! In-memory knowledge base with `search_knowledge` and `fallback_answer` tools.

use super::base::{parse_arguments, Tool};
use crate::structured::{schema_from_type_name, SchemaGenerator};
use crate::types::ToolDefinition;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const SEARCH_TOOL_NAME: &str = "search_knowledge";
pub const FALLBACK_TOOL_NAME: &str = "fallback_answer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// Question/answer records the retrieval assistant is allowed to answer from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub records: Vec<KnowledgeRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KnowledgeDocument {
    Wrapped { records: Vec<KnowledgeRecord> },
    Bare(Vec<KnowledgeRecord>),
}

#[derive(Deserialize)]
struct QuestionArgs {
    question: String,
}

impl KnowledgeBase {
    pub fn new(records: Vec<KnowledgeRecord>) -> Self {
        Self { records }
    }

    /// Accepts `{"records": [...]}` or a bare array of records.
    pub fn from_value(value: Value) -> Result<Self> {
        let doc: KnowledgeDocument = serde_json::from_value(value).map_err(|e| {
            Error::validation_with_context(
                format!("invalid knowledge base: {}", e),
                ErrorContext::new().with_source("knowledge_base"),
            )
        })?;
        let records = match doc {
            KnowledgeDocument::Wrapped { records } | KnowledgeDocument::Bare(records) => records,
        };
        Ok(Self { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn get(&self, id: i64) -> Option<&KnowledgeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_value(&self) -> Value {
        json!({ "records": self.records })
    }
}

fn question_parameters() -> Value {
    SchemaGenerator::new()
        .required_property("question", schema_from_type_name("string"))
        .build()
}

/// Returns the whole knowledge base; the model picks the relevant record.
#[derive(Debug, Clone)]
pub struct SearchKnowledgeTool {
    kb: Arc<KnowledgeBase>,
}

impl SearchKnowledgeTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for SearchKnowledgeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            SEARCH_TOOL_NAME,
            "Get the answer to the user's inquiry from the knowledge base.",
            question_parameters(),
        )
        .strict(true)
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let _: QuestionArgs = parse_arguments(SEARCH_TOOL_NAME, &arguments)?;
        Ok(self.kb.to_value())
    }
}

/// Answer for questions outside the knowledge base.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnswerTool;

impl FallbackAnswerTool {
    pub fn answer(question: &str) -> String {
        format!(
            "Sorry, I can only answer questions related to the e-commerce knowledge base. You asked: {}",
            question
        )
    }
}

#[async_trait]
impl Tool for FallbackAnswerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            FALLBACK_TOOL_NAME,
            "Fallback answer if the question is outside the knowledge base topics.",
            question_parameters(),
        )
        .strict(true)
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let args: QuestionArgs = parse_arguments(FALLBACK_TOOL_NAME, &arguments)?;
        Ok(Value::String(Self::answer(&args.question)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_json_str(
            r#"{"records": [
                {"id": 1, "question": "What is the return policy?", "answer": "Items can be returned within 30 days of purchase with original receipt."},
                {"id": 2, "question": "Do you ship internationally?", "answer": "Yes, we ship to over 50 countries worldwide."}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn accepts_wrapped_and_bare_documents() {
        assert_eq!(kb().len(), 2);
        let bare = KnowledgeBase::from_value(json!([
            {"id": 7, "question": "q", "answer": "a"}
        ]))
        .unwrap();
        assert_eq!(bare.get(7).unwrap().answer, "a");
        assert!(KnowledgeBase::from_value(json!({"items": []})).is_err());
    }

    #[test]
    fn tool_declarations_require_question() {
        let def = SearchKnowledgeTool::new(Arc::new(kb())).definition();
        let params = def.function.parameters.clone().unwrap();
        assert_eq!(params["required"], json!(["question"]));
        assert_eq!(params["additionalProperties"], json!(false));
        assert!(def.is_strict());
    }

    #[tokio::test]
    async fn search_returns_records() {
        let tool = SearchKnowledgeTool::new(Arc::new(kb()));
        let out = tool
            .call(json!({"question": "What is the return policy?"}))
            .await
            .unwrap();
        assert_eq!(out["records"][0]["id"], 1);
    }

    #[tokio::test]
    async fn fallback_names_the_question() {
        let out = FallbackAnswerTool
            .call(json!({"question": "What is the current weather in Tokyo?"}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!("Sorry, I can only answer questions related to the e-commerce knowledge base. You asked: What is the current weather in Tokyo?")
        );
    }
}
