use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vitrine_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid promotion ID: {0}")]
    InvalidPromotionId(String),
    #[error("{0}")]
    ToggleRejected(String),
    #[error(
        "API endpoint is not configured. Pass --api-url and --tenant, or set VITRINE_API_URL and VITRINE_TENANT."
    )]
    EndpointNotConfigured,
}
