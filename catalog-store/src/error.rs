//! Error types for the product store.

use thiserror::Error;

/// Errors from product store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error from the PostgreSQL backend.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A field failed validation at the store boundary.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g., duplicate SKU).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored row could not be decoded into a product.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
