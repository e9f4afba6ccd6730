use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// JSON-over-HTTP transport for an OpenAI-compatible endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body to `path` and return the decoded JSON response.
    ///
    /// Non-2xx responses become [`Error::Remote`], using the endpoint's
    /// `error.message` / `error.type` when the body carries them.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        client_request_id: Option<&str>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.post(&url).json(body);

        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if let Some(id) = client_request_id {
            req = req.header("x-client-request-id", id);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        debug!(%status, bytes = text.len(), "response received from {}", url);

        if !status.is_success() {
            return Err(remote_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::malformed(format!("response body is not JSON ({}): {}", e, truncate(&text)))
        })
    }

    /// GET `url` with query parameters and return the decoded JSON response.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !status.is_success() {
            return Err(remote_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::malformed(format!("response body is not JSON ({}): {}", e, truncate(&text)))
        })
    }
}

/// Plain GET transport for local tools that call public HTTP APIs.
pub fn tool_transport(timeout: Duration) -> Result<HttpTransport> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("tool_transport"),
            )
        })?;
    Ok(HttpTransport {
        client,
        base_url: String::new(),
        api_key: None,
    })
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = truncate(body);
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            }
        });
    let error_type = error
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Error::Remote {
        status: status.as_u16(),
        message,
        error_type,
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 512;
    let text = text.trim();
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
