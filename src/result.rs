//! Uniform result shape for all client operations.
//!
//! Every call into a transport adapter is captured here and converted into a
//! [`KpResult`]. Knowledge search and contribution are advisory, not on the
//! critical path of the calling agent's task, so a registry fault must never
//! surface as a panic or an unhandled error across the facade boundary.

use serde::Serialize;
use serde_json::{json, Value};

use crate::transport::{TransportError, TransportResult};

/// Stable failure classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Server process not running or host unreachable.
    Unreachable,
    /// Per-call deadline exceeded.
    Timeout,
    /// The registry rejected the request with a 4xx/5xx status.
    HttpStatus,
    /// JSON-RPC-level fault inside a successful HTTP response.
    RpcError,
    /// Client-side validation failure (e.g. empty query).
    Validation,
    /// Any other unexpected transport fault.
    Other,
}

impl ErrorKind {
    /// Stable string form (`"unreachable"`, `"timeout"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::RpcError => "rpc_error",
            Self::Validation => "validation",
            Self::Other => "other",
        }
    }
}

impl From<&TransportError> for ErrorKind {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Unreachable(_) => Self::Unreachable,
            TransportError::Timeout(_) => Self::Timeout,
            TransportError::HttpStatus { .. } => Self::HttpStatus,
            TransportError::Rpc { .. } => Self::RpcError,
            TransportError::Other(_) => Self::Other,
        }
    }
}

/// Raw failure details carried alongside the human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureDetails {
    /// HTTP status code, for `http_status` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response body excerpt, truncated at the transport layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_excerpt: Option<String>,
    /// JSON-RPC error code, for `rpc_error` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

/// A failed client operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Stable failure classification.
    pub kind: ErrorKind,
    /// Human-readable, display-safe message.
    pub message: String,
    /// Raw status/body/code details when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FailureDetails>,
}

impl Failure {
    fn from_transport(err: &TransportError) -> Self {
        let details = match err {
            TransportError::HttpStatus { status, body_excerpt } => Some(FailureDetails {
                status: Some(*status),
                body_excerpt: Some(body_excerpt.clone()),
                code: None,
            }),
            TransportError::Rpc { code, .. } => Some(FailureDetails {
                code: Some(*code),
                ..FailureDetails::default()
            }),
            _ => None,
        };
        Self {
            kind: ErrorKind::from(err),
            message: err.to_string(),
            details,
        }
    }
}

/// Outcome of a client operation: payload items, or a classified failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpResult<T> {
    /// The operation succeeded with `count` payload items.
    Success {
        /// Payload items.
        data: Vec<T>,
        /// Number of payload items.
        count: usize,
    },
    /// The operation failed; the failure is a value, never a panic.
    Failure(Failure),
}

impl<T> KpResult<T> {
    /// Build a client-side validation failure (no network call attempted).
    #[must_use]
    pub fn validation(err: impl std::fmt::Display) -> Self {
        Self::Failure(Failure {
            kind: ErrorKind::Validation,
            message: err.to_string(),
            details: None,
        })
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload items, when successful.
    #[must_use]
    pub fn data(&self) -> Option<&[T]> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Failure value, when failed.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl<T: Serialize> KpResult<T> {
    /// Render the result as the JSON shape agent frameworks consume:
    /// `{"success": true, "count": n, "results": [...]}` on success,
    /// `{"success": false, "error": kind, "message": ..., "details": ...}`
    /// on failure.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success { data, count } => json!({
                "success": true,
                "count": count,
                "results": data,
            }),
            Self::Failure(failure) => {
                let mut body = json!({
                    "success": false,
                    "error": failure.kind.as_str(),
                    "message": failure.message,
                });
                if let Some(details) = &failure.details {
                    body["details"] = json!(details);
                }
                body
            }
        }
    }
}

/// Convert a raw transport outcome into a [`KpResult`].
///
/// `extract` selects the payload items from a successful response body. Any
/// transport fault is classified here; this is the single place error kinds
/// are mapped, shared by every operation and both transports.
pub fn normalize<T, F>(outcome: TransportResult, extract: F) -> KpResult<T>
where
    F: FnOnce(Value) -> Result<Vec<T>, TransportError>,
{
    match outcome.and_then(extract) {
        Ok(data) => KpResult::Success {
            count: data.len(),
            data,
        },
        Err(err) => KpResult::Failure(Failure::from_transport(&err)),
    }
}
