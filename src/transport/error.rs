//! Transport error types.

/// Maximum number of characters of an error response body carried in
/// [`TransportError::HttpStatus`]. Bounds the size of error payloads the
/// client hands back to callers.
pub const MAX_BODY_EXCERPT: usize = 500;

/// Truncate an error response body to [`MAX_BODY_EXCERPT`] characters.
#[must_use]
pub fn body_excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT).collect()
}

/// Errors from a single transport attempt.
///
/// One attempt per invocation; no retries happen at this layer. Retry policy
/// belongs to the calling framework.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Server process not running or host unreachable.
    #[error("Registry not available at {0}")]
    Unreachable(String),

    /// Per-call deadline exceeded.
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// The server answered with a 4xx/5xx status.
    #[error("HTTP {status}: {body_excerpt}")]
    HttpStatus {
        /// Status code as reported by the server.
        status: u16,
        /// Response body truncated to [`MAX_BODY_EXCERPT`] characters.
        body_excerpt: String,
    },

    /// JSON-RPC error object inside a successful HTTP response.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// Any other transport-level fault (malformed body, TLS failure).
    #[error("{0}")]
    Other(String),
}
