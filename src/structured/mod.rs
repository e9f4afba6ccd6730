//! Structured output: response formats, schema generation and validation.
//!
//! - [`ResponseFormat`]: what a request asks for (`json_object` or a named JSON schema)
//! - [`OutputValidator`]: validate JSON against a schema
//! - [`StructuredOutput`]: parse model text and decode it into a typed value
//!
//! # Examples
//!
//! ```
//! use llm_patterns::structured::{OutputValidator, ValidationResult};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string"},
//!         "age": {"type": "integer"}
//!     },
//!     "required": ["name"]
//! });
//!
//! let validator = OutputValidator::new(schema).unwrap();
//! let result: ValidationResult = validator.validate(&json!({"name": "Alice", "age": 30}));
//!
//! assert!(result.is_valid());
//! ```

pub mod error;
pub mod json_mode;
pub mod schema;
pub mod validator;

pub use error::{ValidationError, ValidationResult};
pub use json_mode::{JsonMode, ResponseFormat, StructuredOutput};
pub use schema::{
    json_schema_from_type, make_strict, schema_from_type_name, strict_schema_from_type,
    SchemaGenerator,
};
pub use validator::OutputValidator;
