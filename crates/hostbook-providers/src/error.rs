//! Error types for provider setup

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors building a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientInit(String),
}
