use crate::client::core::CompletionClient;
use crate::config::ClientConfig;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Builder for [`CompletionClient`].
///
/// Starts from [`ClientConfig::from_env`] unless a config is supplied; explicit
/// setters win over both.
pub struct CompletionClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    require_api_key: bool,
}

impl CompletionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            base_url: None,
            model: None,
            api_key: None,
            timeout_secs: None,
            require_api_key: true,
        }
    }

    /// Use `config` instead of the environment as the starting point.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the endpoint base URL (e.g. a local server or a mock).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Allow building without credentials, for endpoints that need none.
    pub fn require_api_key(mut self, require: bool) -> Self {
        self.require_api_key = require;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CompletionClient> {
        let mut config = self.config.unwrap_or_else(ClientConfig::from_env);
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        config.validate()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() && self.require_api_key {
            return Err(Error::configuration_with_context(
                "no API key configured",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_details(format!(
                        "set {} or store a key in the system keyring",
                        crate::config::ENV_API_KEY
                    ))
                    .with_source("client_builder"),
            ));
        }

        let transport = Arc::new(HttpTransport::new(&config, api_key)?);
        Ok(CompletionClient { config, transport })
    }
}

impl Default for CompletionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
