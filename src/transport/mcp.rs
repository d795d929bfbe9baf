//! MCP transport adapter: JSON-RPC `tools/call` over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::KpConfig;

use super::{body_excerpt, ToolApi, TransportError, TransportResult};

/// HTTP adapter for the MCP JSON-RPC endpoint.
///
/// Wraps each call in a `tools/call` envelope and distinguishes the
/// envelope's `result` and `error` fields: a JSON-RPC error inside a 2xx
/// response is a failure, never a success.
#[derive(Debug)]
pub struct McpTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl McpTransport {
    /// Create a transport for the given MCP endpoint URL.
    #[must_use]
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a transport from client configuration.
    #[must_use]
    pub fn from_config(config: &KpConfig) -> Self {
        Self::new(&config.mcp_url, config.timeout())
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            // Timeout values never exceed u64::MAX milliseconds.
            #[allow(clippy::cast_possible_truncation)]
            TransportError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_connect() {
            TransportError::Unreachable(self.endpoint.clone())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Build a JSON-RPC 2.0 `tools/call` envelope.
fn build_envelope(id: u64, name: &str, arguments: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": name,
            "arguments": arguments,
        },
    })
}

/// Extract the `result` value from a JSON-RPC response envelope.
fn parse_envelope(envelope: Value) -> TransportResult {
    if let Some(error) = envelope.get("error") {
        return Err(TransportError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string(),
        });
    }

    match envelope {
        Value::Object(mut map) => match map.remove("result") {
            Some(result) => Ok(result),
            None => Err(TransportError::Other(
                "Missing 'result' field in RPC response".to_string(),
            )),
        },
        _ => Err(TransportError::Other(
            "RPC response is not a JSON object".to_string(),
        )),
    }
}

#[async_trait]
impl ToolApi for McpTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = build_envelope(id, name, &arguments);
        tracing::debug!(endpoint = %self.endpoint, tool = name, id, "tools/call");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body_excerpt: body_excerpt(&body),
            });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Other(format!("Malformed response body: {e}")))?;
        parse_envelope(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let envelope = build_envelope(7, "kp_search_skill", &json!({"query": "linting"}));
        assert_eq!(envelope["jsonrpc"], "2.0");
        assert_eq!(envelope["id"], 7);
        assert_eq!(envelope["method"], "tools/call");
        assert_eq!(envelope["params"]["name"], "kp_search_skill");
        assert_eq!(envelope["params"]["arguments"]["query"], "linting");
    }

    #[test]
    fn test_parse_envelope_returns_result_unmodified() {
        let result = parse_envelope(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "found"}]},
        }))
        .unwrap();
        assert_eq!(result, json!({"content": [{"type": "text", "text": "found"}]}));
    }

    #[test]
    fn test_parse_envelope_surfaces_rpc_error() {
        let err = parse_envelope(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"},
        }))
        .unwrap_err();
        assert!(
            matches!(err, TransportError::Rpc { code: -32601, ref message } if message == "Method not found")
        );
    }

    #[test]
    fn test_parse_envelope_rejects_missing_result() {
        let err = parse_envelope(json!({"jsonrpc": "2.0", "id": 1})).unwrap_err();
        assert!(matches!(err, TransportError::Other(_)));
    }

    #[test]
    fn test_transport_ids_are_monotonic() {
        let transport = McpTransport::new("http://localhost:3001/mcp", Duration::from_secs(10));
        let first = transport.next_id.fetch_add(1, Ordering::Relaxed);
        let second = transport.next_id.fetch_add(1, Ordering::Relaxed);
        assert!(second > first);
    }
}
