//! CLI error types.

use mz_config::ConfigError;
use mz_consent::ConsentError;
use mz_html::ParseError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Consent(#[from] ConsentError),

    #[error("invalid page shell: {0}")]
    Page(#[from] ParseError),

    #[error("{0}")]
    Validation(String),
}
