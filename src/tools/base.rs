//! The [`Tool`] trait and a closure-backed implementation.

use crate::types::ToolDefinition;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A locally executed function the model may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declaration sent to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run with the decoded argument payload.
    async fn call(&self, arguments: Value) -> Result<Value>;
}

/// Decode a tool's argument payload into `A`.
pub fn parse_arguments<A: DeserializeOwned>(tool: &str, arguments: &Value) -> Result<A> {
    serde_json::from_value(arguments.clone()).map_err(|e| Error::InvalidToolArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// A tool backed by a synchronous closure.
///
/// ```
/// use llm_patterns::tools::{FnTool, Tool};
/// use llm_patterns::types::ToolDefinition;
/// use serde_json::json;
///
/// let echo = FnTool::new(
///     ToolDefinition::function("echo", "Echo the input.", json!({"type": "object"})),
///     |args| Ok(args),
/// );
/// assert_eq!(echo.definition().name(), "echo");
/// ```
pub struct FnTool<F> {
    definition: ToolDefinition,
    handler: F,
}

impl<F> FnTool<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    pub fn new(definition: ToolDefinition, handler: F) -> Self {
        Self {
            definition,
            handler,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        (self.handler)(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Coordinates {
        latitude: f64,
        longitude: f64,
    }

    #[test]
    fn arguments_decode_into_typed_struct() {
        let args: Coordinates =
            parse_arguments("get_weather", &json!({"latitude": 48.8566, "longitude": 2.3522}))
                .unwrap();
        assert_eq!(args.latitude, 48.8566);
        assert_eq!(args.longitude, 2.3522);
    }

    #[test]
    fn raw_string_arguments_are_rejected() {
        let err = parse_arguments::<Coordinates>("get_weather", &json!("{not json")).unwrap_err();
        match err {
            Error::InvalidToolArguments { tool, .. } => assert_eq!(tool, "get_weather"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fn_tool_runs_closure() {
        let add = FnTool::new(
            ToolDefinition::function("add", "Add two numbers.", json!({"type": "object"})),
            |args| {
                let a = args["a"].as_i64().unwrap_or(0);
                let b = args["b"].as_i64().unwrap_or(0);
                Ok(json!(a + b))
            },
        );
        assert_eq!(add.call(json!({"a": 2, "b": 3})).await.unwrap(), json!(5));
    }
}
