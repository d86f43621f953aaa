//! Error types for the synchronization pipeline.

use thiserror::Error;

use catalog_search::SearchIndexError;
use catalog_store::StoreError;

/// Errors that can occur while applying propagation tasks.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error re-fetching a product from the entity store.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error from the search index while applying a task.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl IngestError {
    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl From<SearchIndexError> for IngestError {
    fn from(err: SearchIndexError) -> Self {
        Self::IndexError(err.to_string())
    }
}
