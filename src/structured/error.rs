//! Error types for structured output validation.

use std::fmt;

/// Validation error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON pointer to the error location (e.g., "/participants/0")
    pub path: Option<String>,
}

impl ValidationError {
    /// Create an error with a path.
    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an error without path.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validation operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
    /// Validated data (None if invalid)
    pub data: Option<serde_json::Value>,
}

impl ValidationResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            data: Some(data),
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: false,
            errors,
            data: None,
        }
    }

    pub fn from_error(error: ValidationError) -> Self {
        Self::failure(vec![error])
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get the validated data.
    ///
    /// Returns None if validation failed.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Convert to Result, keeping all errors if invalid.
    pub fn into_result(self) -> Result<serde_json::Value, Vec<ValidationError>> {
        if self.valid {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(self.errors)
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::without_path("bad").to_string(), "bad");
        assert_eq!(
            ValidationError::with_path("bad", "/date").to_string(),
            "/date: bad"
        );
    }

    #[test]
    fn test_failure_has_no_data() {
        let result = ValidationResult::from_error(ValidationError::without_path("bad"));
        assert!(!result.is_valid());
        assert!(result.data().is_none());
        assert_eq!(result.error_messages(), vec!["bad".to_string()]);
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_success_into_result() {
        let result = ValidationResult::success(json!({"a": 1}));
        assert_eq!(result.into_result().unwrap(), json!({"a": 1}));
    }
}
