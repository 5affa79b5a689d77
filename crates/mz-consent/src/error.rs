//! Consent errors.

/// Error persisting or reading consent.
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    /// I/O error in the consent store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown consent category name.
    #[error("unknown consent category: {0} (expected essential, analytics or marketing)")]
    UnknownCategory(String),
}
