//! Client configuration.
//!
//! Values come from (highest priority first) explicit builder setters, a YAML file or
//! string, environment variables, and finally the built-in defaults below.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keyring service name consulted for the API key.
pub const KEYRING_SERVICE: &str = "llm-patterns";
pub const KEYRING_USER: &str = "openai";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "LLM_PATTERNS_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "LLM_PATTERNS_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with whatever environment variables are set.
    ///
    /// The API key is left unset here; [`resolve_api_key`](Self::resolve_api_key)
    /// reads `OPENAI_API_KEY` only after the keyring.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(model) = env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Some(secs) = env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid client configuration: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "base_url must be non-empty",
                ErrorContext::new().with_field_path("base_url"),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("base_url is not a valid URL: {}", e),
                ErrorContext::new().with_field_path("base_url"),
            )
        })?;
        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "model must be non-empty",
                ErrorContext::new().with_field_path("model"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout_secs must be greater than zero",
                ErrorContext::new().with_field_path("timeout_secs"),
            ));
        }
        Ok(())
    }

    /// Resolve the API key: configured value, then the OS keyring, then `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_openai() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = ClientConfig::from_yaml_str("model: gpt-4o-mini\n").unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn yaml_with_all_fields() {
        let yaml = r#"
base_url: http://localhost:8080/v1
model: local-model
api_key: sk-local
timeout_secs: 5
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api_key.as_deref(), Some("sk-local"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-local"));
    }

    #[test]
    fn env_key_is_not_treated_as_configured() {
        env::set_var(ENV_API_KEY, "sk-from-env");
        let config = ClientConfig::from_env();
        assert!(config.api_key.is_none());
        assert!(config.resolve_api_key().is_some());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ClientConfig::from_yaml_str("timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        let err = ClientConfig::from_yaml_str("base_url: not a url\n").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = ClientConfig::from_yaml_str("timeout_secs: [1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("invalid client configuration"));
    }
}
