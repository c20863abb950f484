//! Error types for profile operations

use thiserror::Error;

use crate::consumer::ConsumerError;
use crate::storage::StoreError;

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors that can occur during registry, collection and CRUD operations
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Named profile is absent
    #[error("Profile '{name}' not found")]
    NotFound { name: String },

    /// A profile with the same name (ignoring case) already exists
    #[error("Profile name '{name}' already exists")]
    DuplicateName { name: String },

    /// Profile name is empty after trimming
    #[error("Profile name cannot be empty")]
    EmptyName,

    /// Unparseable host, port or number during field collection
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The user aborted a required choice
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Profile type is not registered in the catalog
    #[error("Unknown profile type: {0}")]
    UnknownType(String),

    /// Reachability check failed; only produced internally, callers see `inactive`
    #[error("Validation failed for '{name}': {message}")]
    ValidationFailure { name: String, message: String },

    /// Persistence layer error
    #[error("Store error: {0}")]
    StoreFailure(#[from] StoreError),

    /// Consumer tree error
    #[error("Consumer error: {0}")]
    Consumer(#[from] ConsumerError),
}

impl ProfileError {
    /// Get the error code for CLI responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::EmptyName | Self::InvalidInput(_) => "INVALID_INPUT",
            Self::OperationCancelled(_) => "CANCELLED",
            Self::UnknownType(_) => "UNKNOWN_TYPE",
            Self::ValidationFailure { .. } => "VALIDATION_FAILURE",
            Self::StoreFailure(_) => "STORE_FAILURE",
            Self::Consumer(_) => "CONSUMER_FAILURE",
        }
    }

    /// Whether this error is a user error that is reported as a message
    /// rather than a failure of the system
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName { .. }
                | Self::EmptyName
                | Self::InvalidInput(_)
                | Self::OperationCancelled(_)
                | Self::NotFound { .. }
        )
    }

    pub(crate) fn cancelled(what: impl Into<String>) -> Self {
        Self::OperationCancelled(what.into())
    }
}
