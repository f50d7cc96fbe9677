//! Error types for vitrine-core

use thiserror::Error;

use crate::models::PromotionId;

/// Result type alias using vitrine-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vitrine-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by the admin API
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not match the expected wire shape
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    /// A page carried more items than its declared page size
    #[error("Page overflow: {len} items exceeds page size {page_size}")]
    PageOverflow { len: usize, page_size: u32 },

    /// A mutation for this record is already pending
    #[error("Mutation already in flight for promotion {0}")]
    MutationInFlight(PromotionId),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
