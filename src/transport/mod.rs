//! Transport adapters for the registry REST API and the MCP JSON-RPC endpoint.
//!
//! Both adapters capture every network-level fault as a [`TransportError`];
//! nothing at this layer panics or retries. The traits are the seams the
//! client facade is generic over, so tests can substitute mock transports.

mod error;
mod mcp;
mod rest;

pub use error::{body_excerpt, TransportError, MAX_BODY_EXCERPT};
pub use mcp::McpTransport;
pub use rest::RestTransport;

use async_trait::async_trait;
use serde_json::Value;

/// Outcome of a single transport attempt: the parsed response body, or a
/// transport fault.
pub type TransportResult = Result<Value, TransportError>;

/// Plain REST access to the registry.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Issue a GET to `path` with the given query parameters.
    async fn get(&self, path: &str, params: &[(String, String)]) -> TransportResult;

    /// Issue a POST to `path` with a JSON body.
    async fn post(&self, path: &str, body: &Value) -> TransportResult;
}

/// Tool invocation over the MCP JSON-RPC endpoint.
#[async_trait]
pub trait ToolApi: Send + Sync {
    /// Call a named tool with a JSON arguments object, returning the
    /// JSON-RPC `result` value.
    async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult;
}
