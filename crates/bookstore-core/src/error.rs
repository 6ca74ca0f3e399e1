//! Error types for the bookstore core.
//!
//! Only recoverable outcomes live here. Registration misuse (registering the
//! same provider name twice) is a programming error and panics instead; see
//! [`crate::registry::StoreRegistry::register`].

use thiserror::Error;

/// Main error type for storage and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // Business-rule errors
    #[error("book already exists: {id}")]
    AlreadyExists { id: String },

    #[error("book not found: {id}")]
    NotFound { id: String },

    // Configuration errors
    #[error("store: unknown provider {name}")]
    UnknownProvider { name: String },
}

/// Result type alias for bookstore operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn already_exists(id: impl Into<String>) -> Self {
        StoreError::AlreadyExists { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    pub fn unknown_provider(name: impl Into<String>) -> Self {
        StoreError::UnknownProvider { name: name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    /// Whether the error comes from the request's input versus stored state,
    /// as opposed to a provider configuration problem.
    pub fn is_business_error(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadyExists { .. } | StoreError::NotFound { .. }
        )
    }
}
