//! CLI error types.

use chatmark_config::ConfigError;
use chatmark_renderer::UrlRejection;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base origin: {0}")]
    BaseOrigin(#[from] UrlRejection),
}
