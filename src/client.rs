//! Client facade over the REST and MCP transports.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::KpConfig;
use crate::query::SearchQuery;
use crate::result::{normalize, KpResult};
use crate::transport::{
    McpTransport, RegistryApi, RestTransport, ToolApi, TransportError, TransportResult,
};
use crate::unit::{KnowledgeUnit, Skill, Visibility};

/// Tool names exposed by the MCP server.
pub mod tool_names {
    /// Search reusable skills.
    pub const SEARCH_SKILL: &str = "kp_search_skill";
    /// Search knowledge units.
    pub const SEARCH_KNOWLEDGE: &str = "kp_search_knowledge";
    /// Contribute a knowledge unit.
    pub const CONTRIBUTE_KNOWLEDGE: &str = "kp_contribute_knowledge";
}

/// Entry point for registry operations over both transports.
///
/// Every operation is a pure composition: build parameters, invoke the
/// matching transport, normalize the outcome. No state is retained between
/// calls, so one instance is safe to share across concurrent callers.
/// Generic over the transport traits so tests can substitute mocks.
#[derive(Debug)]
pub struct KpClient<R = RestTransport, M = McpTransport> {
    rest: R,
    mcp: M,
}

impl KpClient {
    /// Create a client from configuration, with reqwest-backed transports.
    #[must_use]
    pub fn new(config: &KpConfig) -> Self {
        Self {
            rest: RestTransport::from_config(config),
            mcp: McpTransport::from_config(config),
        }
    }

    /// Create a client from environment variables and defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(&KpConfig::from_env())
    }
}

impl<R: RegistryApi, M: ToolApi> KpClient<R, M> {
    /// Create a client over explicit transport implementations.
    #[must_use]
    pub fn with_transports(rest: R, mcp: M) -> Self {
        Self { rest, mcp }
    }

    /// The REST transport in use.
    #[must_use]
    pub fn rest_transport(&self) -> &R {
        &self.rest
    }

    /// The MCP transport in use.
    #[must_use]
    pub fn mcp_transport(&self) -> &M {
        &self.mcp
    }

    /// Search knowledge units (`GET /v1/knowledge`).
    pub async fn search_knowledge(&self, query: &SearchQuery) -> KpResult<KnowledgeUnit> {
        self.search("/v1/knowledge", query).await
    }

    /// Search reusable skills (`GET /v1/skills`).
    pub async fn search_skills(&self, query: &SearchQuery) -> KpResult<Skill> {
        self.search("/v1/skills", query).await
    }

    async fn search<T: DeserializeOwned>(&self, path: &str, query: &SearchQuery) -> KpResult<T> {
        let params = match query.rest_params() {
            Ok(params) => params,
            Err(err) => return KpResult::validation(err),
        };
        finish(path, self.rest.get(path, &params).await, extract_data)
    }

    /// Contribute a knowledge unit (`POST /v1/knowledge`).
    ///
    /// When `visibility` is given it overrides `metadata.visibility` before
    /// transmission; the caller's unit is never mutated. The created entry
    /// comes back as a single-element success.
    pub async fn contribute_knowledge(
        &self,
        unit: &KnowledgeUnit,
        visibility: Option<Visibility>,
    ) -> KpResult<KnowledgeUnit> {
        let prepared = unit.prepare_for_submission(visibility);
        let body = match serde_json::to_value(&prepared) {
            Ok(body) => body,
            Err(err) => return KpResult::validation(format!("Unserializable unit: {err}")),
        };
        let path = "/v1/knowledge";
        finish(path, self.rest.post(path, &body).await, extract_entry)
    }

    /// Invoke a named MCP tool, wrapping the JSON-RPC `result` value
    /// unmodified as a single-element success.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> KpResult<Value> {
        finish(name, self.mcp.call_tool(name, arguments).await, |value| Ok(vec![value]))
    }

    /// Search knowledge units through the MCP transport
    /// (`kp_search_knowledge`), passing list filters as JSON arrays.
    pub async fn search_knowledge_via_tool(&self, query: &SearchQuery) -> KpResult<Value> {
        let arguments = match query.mcp_arguments() {
            Ok(arguments) => arguments,
            Err(err) => return KpResult::validation(err),
        };
        self.call_tool(tool_names::SEARCH_KNOWLEDGE, arguments).await
    }

    /// Search skills through the MCP transport (`kp_search_skill`).
    pub async fn search_skills_via_tool(&self, query: &SearchQuery) -> KpResult<Value> {
        let arguments = match query.mcp_arguments() {
            Ok(arguments) => arguments,
            Err(err) => return KpResult::validation(err),
        };
        self.call_tool(tool_names::SEARCH_SKILL, arguments).await
    }
}

/// Normalize a transport outcome, logging failures once at the facade.
fn finish<T, F>(operation: &str, outcome: TransportResult, extract: F) -> KpResult<T>
where
    F: FnOnce(Value) -> Result<Vec<T>, TransportError>,
{
    let result = normalize(outcome, extract);
    if let Some(failure) = result.failure() {
        tracing::warn!(
            operation,
            kind = failure.kind.as_str(),
            error = %failure.message,
            "Registry operation failed"
        );
    }
    result
}

/// Pull the `data` array out of a search response body. A missing `data`
/// field reads as an empty result set, matching the registry's list shape.
fn extract_data<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, TransportError> {
    let data = match body {
        Value::Object(mut map) => map.remove("data").unwrap_or_else(|| Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(data)
        .map_err(|e| TransportError::Other(format!("Malformed response body: {e}")))
}

/// Pull the created entry out of a contribution response body; the registry
/// answers with either the entry itself or `{data: entry}`.
fn extract_entry<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, TransportError> {
    let entry = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(entry)
        .map(|entry| vec![entry])
        .map_err(|e| TransportError::Other(format!("Malformed response body: {e}")))
}
