//! REST transport adapter backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::KpConfig;

use super::{body_excerpt, RegistryApi, TransportError, TransportResult};

/// HTTP adapter for the registry's REST API.
///
/// Holds no per-call state. Each invocation is a single attempt with a hard
/// per-call deadline; failures map into [`TransportError`].
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RestTransport {
    /// Create a transport for `base_url`, stripping any trailing slash.
    #[must_use]
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }

    /// Create a transport from client configuration.
    #[must_use]
    pub fn from_config(config: &KpConfig) -> Self {
        Self::new(&config.registry_url, config.api_key.clone(), config.timeout())
    }

    /// The configured base URL (trailing slash stripped).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn apply_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Content-Type", "application/json")
            .timeout(self.timeout);
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    fn map_send_error(&self, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            // Timeout values never exceed u64::MAX milliseconds.
            #[allow(clippy::cast_possible_truncation)]
            TransportError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_connect() {
            TransportError::Unreachable(self.base_url.clone())
        } else {
            TransportError::Other(err.to_string())
        }
    }

    async fn read_response(response: reqwest::Response) -> TransportResult {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| TransportError::Other(format!("Malformed response body: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::HttpStatus {
            status: status.as_u16(),
            body_excerpt: body_excerpt(&body),
        })
    }
}

#[async_trait]
impl RegistryApi for RestTransport {
    async fn get(&self, path: &str, params: &[(String, String)]) -> TransportResult {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .apply_headers(self.client.get(&url))
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        Self::read_response(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> TransportResult {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let response = self
            .apply_headers(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        Self::read_response(response).await
    }
}
