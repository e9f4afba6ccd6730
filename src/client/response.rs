use super::request::CompletionRequest;
use crate::structured::{ResponseFormat, StructuredOutput, ValidationError};
use crate::types::{Message, ToolCall};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Token accounting reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The assistant turn returned for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    /// Assistant message, including any tool invocations, ready to append to history.
    pub message: Message,
    pub refusal: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
    pub id: Option<String>,
    pub model: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    refusal: Option<String>,
}

impl ModelReply {
    /// Plain assistant text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_message(Message::assistant(content))
    }

    /// Assistant reply that requests tool invocations.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::from_message(Message::assistant_tool_calls(None, calls))
    }

    fn from_message(message: Message) -> Self {
        let finish_reason = if message.has_tool_calls() {
            "tool_calls"
        } else {
            "stop"
        };
        Self {
            message,
            refusal: None,
            finish_reason: Some(finish_reason.to_string()),
            usage: None,
            id: None,
            model: None,
        }
    }

    /// Decode a `/chat/completions` response body; only the first choice is used.
    pub fn from_value(value: Value) -> Result<Self> {
        let response: ChatCompletionResponse = serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("unexpected completion shape: {}", e)))?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed("completion contains no choices"))?;

        let tool_calls = choice.message.tool_calls.unwrap_or_default();
        Ok(Self {
            message: Message::assistant_tool_calls(choice.message.content, tool_calls),
            refusal: choice.message.refusal,
            finish_reason: choice.finish_reason,
            usage: response.usage,
            id: response.id,
            model: response.model,
        })
    }

    pub fn content(&self) -> Option<&str> {
        self.message.text_content()
    }

    pub fn tool_calls_requested(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }

    pub fn has_tool_calls(&self) -> bool {
        self.message.has_tool_calls()
    }
}

/// Outcome of one completion under the requester contract.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult<T = Value> {
    Text(String),
    Structured(T),
    /// Invocations the caller must execute before re-submitting.
    ToolCalls(Vec<ToolCall>),
    /// The output did not conform to the requested schema. Not a fatal error.
    SchemaMismatch {
        raw: String,
        errors: Vec<ValidationError>,
    },
    Refusal(String),
}

impl<T: DeserializeOwned> CompletionResult<T> {
    /// Interpret `reply` against what `request` asked for.
    ///
    /// Tool invocations win over everything else and a refusal yields no object.
    /// Under a JSON schema the whole content must be one conforming JSON document;
    /// prose or fences around an object make it a mismatch. Plain JSON mode still
    /// extracts an object from fenced or surrounding text.
    pub fn from_reply(request: &CompletionRequest, reply: &ModelReply) -> Self {
        if reply.has_tool_calls() {
            return CompletionResult::ToolCalls(reply.tool_calls_requested().to_vec());
        }

        if let Some(refusal) = &reply.refusal {
            warn!("model refused the request: {}", refusal);
            return CompletionResult::Refusal(refusal.clone());
        }

        let raw = reply.content().unwrap_or_default().to_string();
        let Some(format) = &request.response_format else {
            return CompletionResult::Text(raw);
        };

        let validator = match format.validator() {
            Ok(v) => v,
            Err(e) => {
                return CompletionResult::SchemaMismatch {
                    raw,
                    errors: vec![e],
                }
            }
        };

        let output = match format {
            ResponseFormat::JsonSchema { .. } => {
                StructuredOutput::from_exact_response(raw, &validator)
            }
            ResponseFormat::JsonObject => StructuredOutput::from_response(raw, &validator),
        };
        match output.decode::<T>() {
            Ok(value) => CompletionResult::Structured(value),
            Err(errors) => {
                warn!(
                    schema = format.name().unwrap_or(format.mode().as_str()),
                    "structured output did not match the schema: {}",
                    errors
                        .iter()
                        .map(|e| e.to_string())
                        .collect::<Vec<_>>()
                        .join("; ")
                );
                CompletionResult::SchemaMismatch {
                    raw: output.raw,
                    errors,
                }
            }
        }
    }
}

impl<T> CompletionResult<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            CompletionResult::Structured(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_parsed(self) -> Option<T> {
        match self {
            CompletionResult::Structured(v) => Some(v),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionResult::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            CompletionResult::ToolCalls(calls) => Some(calls),
            _ => None,
        }
    }

    /// True for outcomes that carry no usable answer (mismatch or refusal).
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            CompletionResult::SchemaMismatch { .. } | CompletionResult::Refusal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        answer: String,
        source: i64,
    }

    fn answer_format() -> ResponseFormat {
        ResponseFormat::from_schema(
            json!({
                "type": "object",
                "properties": {"answer": {"type": "string"}, "source": {"type": "integer"}},
                "required": ["answer", "source"],
                "additionalProperties": false
            }),
            "InquiryResponse",
            true,
        )
    }

    #[test]
    fn decodes_tool_call_response() {
        let reply = ModelReply::from_value(json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"latitude\":48.8566,\"longitude\":2.3522}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        assert!(reply.has_tool_calls());
        assert_eq!(reply.finish_reason.as_deref(), Some("tool_calls"));
        assert_eq!(reply.usage.unwrap().total_tokens, 15);

        let result: CompletionResult = CompletionResult::from_reply(
            &CompletionRequest::new(vec![Message::user("weather?")]),
            &reply,
        );
        let calls = result.tool_calls().unwrap();
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments["latitude"], json!(48.8566));
    }

    #[test]
    fn missing_choices_is_malformed() {
        let err = ModelReply::from_value(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn null_tool_calls_are_accepted() {
        let reply = ModelReply::from_value(json!({
            "choices": [{"message": {"content": "Hello", "tool_calls": null}}]
        }))
        .unwrap();
        assert_eq!(reply.content(), Some("Hello"));
        assert!(!reply.has_tool_calls());
    }

    #[test]
    fn text_result_without_format() {
        let request = CompletionRequest::new(vec![Message::user("poem")]);
        let result: CompletionResult = CompletionResult::from_reply(&request, &ModelReply::text("Roses"));
        assert_eq!(result.text(), Some("Roses"));
    }

    #[test]
    fn structured_result_decodes_whole_object() {
        let request =
            CompletionRequest::new(vec![Message::user("return policy?")]).response_format(answer_format());
        let reply = ModelReply::text(r#"{"answer": "30 days", "source": 1}"#);
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert_eq!(
            result.into_parsed(),
            Some(Answer {
                answer: "30 days".into(),
                source: 1
            })
        );
    }

    #[test]
    fn nonconforming_output_is_a_mismatch_not_a_partial_object() {
        let request =
            CompletionRequest::new(vec![Message::user("return policy?")]).response_format(answer_format());
        let reply = ModelReply::text(r#"{"answer": "30 days"}"#);
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert!(result.is_empty_result());
        assert!(result.parsed().is_none());
        match result {
            CompletionResult::SchemaMismatch { raw, errors } => {
                assert!(raw.contains("30 days"));
                assert!(!errors.is_empty());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn prose_around_an_object_is_a_mismatch_under_a_schema() {
        let request =
            CompletionRequest::new(vec![Message::user("return policy?")]).response_format(answer_format());
        let reply = ModelReply::text(
            "I am not sure. It might look like {\"answer\": \"30 days\", \"source\": 1} but I could not confirm it.",
        );
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert!(result.parsed().is_none());
        match result {
            CompletionResult::SchemaMismatch { raw, errors } => {
                assert!(raw.starts_with("I am not sure."));
                assert_eq!(errors[0].to_string(), "response is not valid JSON");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn fenced_json_is_a_mismatch_under_a_schema() {
        let request =
            CompletionRequest::new(vec![Message::user("return policy?")]).response_format(answer_format());
        let reply = ModelReply::text("```json\n{\"answer\": \"30 days\", \"source\": 1}\n```");
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert!(result.is_empty_result());
        assert!(result.parsed().is_none());
    }

    #[test]
    fn json_object_mode_extracts_fenced_json() {
        let request = CompletionRequest::new(vec![Message::user("return policy?")])
            .response_format(ResponseFormat::json_object());
        let reply = ModelReply::text("Here it is:\n```json\n{\"answer\": \"30 days\", \"source\": 1}\n```");
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert_eq!(result.parsed().map(|a| a.source), Some(1));
    }

    #[test]
    fn refusal_yields_no_object() {
        let request =
            CompletionRequest::new(vec![Message::user("?")]).response_format(answer_format());
        let mut reply = ModelReply::text("");
        reply.refusal = Some("I can't help with that.".into());
        let result = CompletionResult::<Answer>::from_reply(&request, &reply);
        assert_eq!(result, CompletionResult::Refusal("I can't help with that.".into()));
    }
}
