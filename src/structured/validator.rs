//! Output validator for structured responses.
//!
//! Schemas are compiled once with the `jsonschema` crate (Draft 7) and reused for every
//! response checked against them.

use crate::structured::error::{ValidationError, ValidationResult};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::sync::Arc;

/// Validator for structured output.
#[derive(Clone)]
pub struct OutputValidator {
    schema: Option<Value>,
    compiled: Option<Arc<JSONSchema>>,
}

impl OutputValidator {
    /// Compile a validator for `schema`.
    ///
    /// Fails when the schema itself is not a valid Draft 7 schema.
    pub fn new(schema: Value) -> Result<Self, ValidationError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| ValidationError::without_path(format!("invalid schema: {}", e)))?;
        Ok(Self {
            schema: Some(schema),
            compiled: Some(Arc::new(compiled)),
        })
    }

    /// Create a validator without a schema (permissive mode).
    pub fn permissive() -> Self {
        Self {
            schema: None,
            compiled: None,
        }
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// Validate data against the schema.
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let Some(compiled) = &self.compiled else {
            return ValidationResult::success(data.clone());
        };

        let outcome = compiled.validate(data);
        match outcome {
            Ok(()) => ValidationResult::success(data.clone()),
            Err(errors) => ValidationResult::failure(
                errors
                    .map(|e| {
                        let path = e.instance_path.to_string();
                        if path.is_empty() {
                            ValidationError::without_path(e.to_string())
                        } else {
                            ValidationError::with_path(e.to_string(), path)
                        }
                    })
                    .collect(),
            ),
        }
    }

    /// Validate data and return the validated value or the errors.
    pub fn validate_or_fail(&self, data: &Value) -> Result<Value, Vec<ValidationError>> {
        self.validate(data).into_result()
    }
}

impl std::fmt::Debug for OutputValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputValidator")
            .field("schema", &self.schema)
            .finish()
    }
}
