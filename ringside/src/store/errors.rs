//! Document store error types.

use thiserror::Error;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No document with this id in the container
    #[error("Document not found: {container}/{id}")]
    NotFound { container: String, id: String },

    /// A document with this id already exists
    #[error("Document already exists: {container}/{id}")]
    AlreadyExists { container: String, id: String },

    /// Document has no string `id` field
    #[error("Document in {0} has no id")]
    MissingId(String),
}

impl StoreError {
    pub fn not_found(container: &str, id: &str) -> Self {
        StoreError::NotFound {
            container: container.to_string(),
            id: id.to_string(),
        }
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            StoreError::Database(_) => "Internal server error".to_string(),
            StoreError::Serialization(_) => "Malformed document".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
