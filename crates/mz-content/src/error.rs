//! Error types for content retrieval.

/// Error from a content source.
///
/// These never reach [`CmsAdapter`](crate::CmsAdapter) callers: the adapter
/// logs them and moves on to the next source or the fallback.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error reading static content.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// The payload is not a JSON object.
    #[error("unexpected payload from {0}: expected a JSON object")]
    InvalidPayload(String),

    /// The content API answered with `success: false`.
    #[error("content API reported failure for {0}")]
    Unsuccessful(String),
}
