//! Tool calling definitions in the OpenAI chat-completions wire shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition (for function calling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>, // JSON Schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters: Some(parameters),
                strict: None,
            },
        }
    }

    /// Declare a function whose parameters are derived from `A`, closed for strict mode.
    pub fn for_args<A: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut parameters = crate::structured::strict_schema_from_type::<A>();
        if let Value::Object(map) = &mut parameters {
            map.remove("title");
            map.remove("description");
        }
        Self::function(name, description, parameters).strict(true)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.function.strict = Some(strict);
        self
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn is_strict(&self) -> bool {
        self.function.strict.unwrap_or(false)
    }
}

/// Tool call (invocation from model)
///
/// The wire form carries `arguments` as a JSON-encoded string. It is decoded on receipt;
/// a payload that is not valid JSON is kept as the raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireToolCall", into = "WireToolCall")]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Argument lookup by name, for objects only.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.as_object().and_then(|m| m.get(name))
    }
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<WireToolCall> for ToolCall {
    fn from(wire: WireToolCall) -> Self {
        let raw = wire.function.arguments.trim();
        let arguments = if raw.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        ToolCall {
            id: wire.id,
            name: wire.function.name,
            arguments,
        }
    }
}

impl From<ToolCall> for WireToolCall {
    fn from(call: ToolCall) -> Self {
        let arguments = match call.arguments {
            Value::String(raw) => raw,
            other => other.to_string(),
        };
        WireToolCall {
            id: call.id,
            kind: function_type(),
            function: WireFunctionCall {
                name: call.name,
                arguments,
            },
        }
    }
}

/// Tool result (response to tool call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub name: String,
    pub content: Value,
}

impl ToolResult {
    /// The text placed in the `tool` message: strings verbatim, other values as JSON.
    pub fn content_text(&self) -> String {
        stringify(&self.content)
    }
}

pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
