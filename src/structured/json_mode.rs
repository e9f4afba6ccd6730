//! JSON mode support for structured output.
//!
//! [`ResponseFormat`] is what a request asks the endpoint for; [`StructuredOutput`] is
//! what comes back, parsed and checked against the requested schema.

use crate::structured::error::{ValidationError, ValidationResult};
use crate::structured::validator::OutputValidator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON mode options for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonMode {
    /// Standard JSON mode - guarantees valid JSON output
    Json,

    /// JSON with schema validation - requires strict schema compliance
    JsonSchema,
}

impl JsonMode {
    /// Get the string representation for API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonMode::Json => "json_object",
            JsonMode::JsonSchema => "json_schema",
        }
    }
}

impl std::fmt::Display for JsonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JsonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json_object" => Ok(JsonMode::Json),
            "json_schema" => Ok(JsonMode::JsonSchema),
            _ => Err(format!("Unknown JSON mode: {}", s)),
        }
    }
}

/// Output format requested from the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Any JSON object.
    JsonObject,
    /// A named schema the output must conform to.
    JsonSchema {
        name: String,
        schema: Value,
        strict: bool,
    },
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        ResponseFormat::JsonObject
    }

    /// Example:
    ///
    /// ```
    /// use llm_patterns::structured::{JsonMode, ResponseFormat};
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {"name": {"type": "string"}},
    ///     "required": ["name"],
    ///     "additionalProperties": false
    /// });
    ///
    /// let format = ResponseFormat::from_schema(schema, "Person", true);
    /// assert_eq!(format.mode(), JsonMode::JsonSchema);
    /// assert_eq!(format.to_openai_format()["json_schema"]["name"], "Person");
    /// ```
    pub fn from_schema(schema: Value, name: impl Into<String>, strict: bool) -> Self {
        ResponseFormat::JsonSchema {
            name: name.into(),
            schema,
            strict,
        }
    }

    /// Strict schema derived from `T`, named after the type.
    pub fn for_type<T: schemars::JsonSchema>() -> Self {
        Self::from_schema(
            crate::structured::strict_schema_from_type::<T>(),
            T::schema_name(),
            true,
        )
    }

    pub fn mode(&self) -> JsonMode {
        match self {
            ResponseFormat::JsonObject => JsonMode::Json,
            ResponseFormat::JsonSchema { .. } => JsonMode::JsonSchema,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ResponseFormat::JsonObject => None,
            ResponseFormat::JsonSchema { name, .. } => Some(name),
        }
    }

    pub fn schema(&self) -> Option<&Value> {
        match self {
            ResponseFormat::JsonObject => None,
            ResponseFormat::JsonSchema { schema, .. } => Some(schema),
        }
    }

    /// Value of the `response_format` request field.
    ///
    /// ```json
    /// {
    ///   "type": "json_schema",
    ///   "json_schema": { "name": "CalendarEvent", "strict": true, "schema": { ... } }
    /// }
    /// ```
    pub fn to_openai_format(&self) -> Value {
        match self {
            ResponseFormat::JsonObject => serde_json::json!({
                "type": self.mode().as_str()
            }),
            ResponseFormat::JsonSchema {
                name,
                schema,
                strict,
            } => serde_json::json!({
                "type": self.mode().as_str(),
                "json_schema": {
                    "name": name,
                    "strict": strict,
                    "schema": schema
                }
            }),
        }
    }

    /// Validator matching this format (permissive for plain JSON mode).
    pub fn validator(&self) -> Result<OutputValidator, ValidationError> {
        match self.schema() {
            Some(schema) => OutputValidator::new(schema.clone()),
            None => Ok(OutputValidator::permissive()),
        }
    }
}

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced json pattern is valid")
});
static FENCED_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").expect("fenced pattern is valid"));
static EMBEDDED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("object pattern is valid"));
static EMBEDDED_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("array pattern is valid"));

/// Structured output result with validation.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    /// Raw response content as string
    pub raw: String,

    /// Parsed JSON data (None if parsing failed)
    pub parsed: Option<Value>,

    /// Validation result (always populated)
    pub validation_result: ValidationResult,
}

impl StructuredOutput {
    /// Parse without a schema. Text that holds no JSON fails validation.
    pub fn from_response_unvalidated(content: impl Into<String>) -> Self {
        let raw = content.into();
        let parsed = Self::parse_json(raw.trim());
        Self::with_parsed(raw, parsed)
    }

    /// Parse the whole of `content` as a single JSON document and validate it.
    ///
    /// Nothing is extracted from code fences or surrounding prose, so any text
    /// that is not exactly one JSON value fails.
    pub fn from_exact_response(content: impl Into<String>, validator: &OutputValidator) -> Self {
        let raw = content.into();
        let parsed = serde_json::from_str::<Value>(raw.trim()).ok();
        let mut output = Self::with_parsed(raw, parsed);
        if let Some(parsed) = &output.parsed {
            output.validation_result = validator.validate(parsed);
        }
        output
    }

    fn with_parsed(raw: String, parsed: Option<Value>) -> Self {
        let validation_result = match &parsed {
            Some(value) => ValidationResult::success(value.clone()),
            None => ValidationResult::from_error(ValidationError::without_path(
                "response is not valid JSON",
            )),
        };
        Self {
            raw,
            parsed,
            validation_result,
        }
    }

    /// Parse and validate against `validator`, extracting JSON from fences or prose.
    ///
    /// ```
    /// use llm_patterns::structured::{OutputValidator, StructuredOutput};
    /// use serde_json::json;
    ///
    /// let validator = OutputValidator::new(json!({
    ///     "type": "object",
    ///     "properties": {"name": {"type": "string"}},
    ///     "required": ["name"]
    /// }))
    /// .unwrap();
    ///
    /// let output = StructuredOutput::from_response(r#"{"name": "Alice"}"#, &validator);
    /// assert!(output.is_valid());
    /// ```
    pub fn from_response(content: impl Into<String>, validator: &OutputValidator) -> Self {
        let mut output = Self::from_response_unvalidated(content);
        if let Some(parsed) = &output.parsed {
            output.validation_result = validator.validate(parsed);
        }
        output
    }

    /// Parse JSON from text, with support for markdown code blocks.
    ///
    /// Extracts JSON from common formats:
    /// - Raw JSON object
    /// - ```json ... ``` code blocks
    /// - ``` ... ``` code blocks
    /// - Text containing JSON objects/arrays
    fn parse_json(text: &str) -> Option<Value> {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            return Some(parsed);
        }

        for re in [&FENCED_JSON, &FENCED_ANY, &EMBEDDED_OBJECT, &EMBEDDED_ARRAY] {
            if let Some(captures) = re.captures(text) {
                let candidate = match captures.get(1) {
                    Some(inner) => inner.as_str(),
                    None => captures.get(0).map(|c| c.as_str()).unwrap_or(text),
                };

                if let Ok(parsed) = serde_json::from_str::<Value>(candidate.trim()) {
                    return Some(parsed);
                }
            }
        }

        None
    }

    pub fn is_valid(&self) -> bool {
        self.validation_result.is_valid()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.validation_result.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.validation_result.error_messages()
    }

    /// Decode into `T` only when the output validated; never yields a partial object.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Vec<ValidationError>> {
        let data = self
            .validation_result
            .data()
            .ok_or_else(|| self.validation_result.errors.clone())?;
        serde_json::from_value(data.clone())
            .map_err(|e| vec![ValidationError::without_path(e.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct CalendarEvent {
        name: String,
        date: String,
        participants: Vec<String>,
    }

    fn event_validator() -> OutputValidator {
        OutputValidator::new(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "date": {"type": "string"},
                "participants": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["name", "date", "participants"],
            "additionalProperties": false
        }))
        .unwrap()
    }

    #[test]
    fn test_json_mode_display_and_parse() {
        assert_eq!(JsonMode::Json.to_string(), "json_object");
        assert_eq!("json_schema".parse::<JsonMode>().unwrap(), JsonMode::JsonSchema);
        assert!("".parse::<JsonMode>().is_err());
        assert!("yaml".parse::<JsonMode>().is_err());
    }

    #[test]
    fn test_json_object_format() {
        let format = ResponseFormat::json_object();
        assert_eq!(format.to_openai_format(), json!({"type": "json_object"}));
        assert!(format.name().is_none());
        assert!(format.validator().unwrap().schema().is_none());
    }

    #[test]
    fn test_json_schema_format() {
        let schema = json!({"type": "string"});
        let format = ResponseFormat::from_schema(schema.clone(), "test", false);
        let v = format.to_openai_format();
        assert_eq!(v["type"], "json_schema");
        assert_eq!(v["json_schema"]["name"], "test");
        assert_eq!(v["json_schema"]["strict"], false);
        assert_eq!(v["json_schema"]["schema"], schema);
    }

    #[test]
    fn test_decode_valid_event() {
        let output = StructuredOutput::from_response(
            r#"{"name": "Meeting", "date": "2025-04-22", "participants": ["John", "Jane"]}"#,
            &event_validator(),
        );
        let event: CalendarEvent = output.decode().unwrap();
        assert_eq!(event.date, "2025-04-22");
        assert_eq!(event.participants, vec!["John", "Jane"]);
    }

    #[test]
    fn test_partial_object_is_not_decoded() {
        let output = StructuredOutput::from_response(
            r#"{"name": "Meeting", "date": "2025-04-22"}"#,
            &event_validator(),
        );
        assert!(!output.is_valid());
        assert!(output.parsed().is_some());
        assert!(output.decode::<CalendarEvent>().is_err());
    }

    #[test]
    fn test_non_json_text_fails() {
        let output = StructuredOutput::from_response("Sure! The meeting is on Tuesday.", &event_validator());
        assert!(output.parsed().is_none());
        assert!(!output.is_valid());
        assert_eq!(output.error_messages(), vec!["response is not valid JSON"]);
    }

    #[test]
    fn test_json_from_markdown_fence() {
        let output = StructuredOutput::from_response_unvalidated(
            r#"Here is the JSON:
            ```json
            {"result": "success"}
            ```"#,
        );
        assert_eq!(output.parsed().unwrap()["result"], "success");
    }

    #[test]
    fn test_exact_response_accepts_surrounding_whitespace() {
        let output = StructuredOutput::from_exact_response(
            "\n  {\"name\": \"Meeting\", \"date\": \"2025-04-22\", \"participants\": []}\n",
            &event_validator(),
        );
        assert!(output.is_valid());
        assert_eq!(output.decode::<CalendarEvent>().unwrap().name, "Meeting");
    }

    #[test]
    fn test_exact_response_does_not_extract_from_fence() {
        let output = StructuredOutput::from_exact_response(
            "```json\n{\"name\": \"Meeting\", \"date\": \"2025-04-22\", \"participants\": []}\n```",
            &event_validator(),
        );
        assert!(output.parsed().is_none());
        assert_eq!(output.error_messages(), vec!["response is not valid JSON"]);
    }

    #[test]
    fn test_type_mismatch_fails_decode_without_schema() {
        let output = StructuredOutput::from_response_unvalidated(r#"{"name": 1}"#);
        assert!(output.is_valid());
        assert!(output.decode::<CalendarEvent>().is_err());
    }
}
