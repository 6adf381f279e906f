//! Catalog error types.

use thiserror::Error;

/// Errors raised by a [`ProductStore`](crate::store::ProductStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected because the record breaks a catalog invariant.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Stored data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reading a catalog snapshot from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The caller's query was rejected before the pipeline ran.
    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Search configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The storage collaborator failed; never masked as an empty result.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Whether the error was caused by the caller rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidInput(_) | CatalogError::ProductNotFound(_)
        )
    }
}
