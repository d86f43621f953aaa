//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations. The trait is the boundary
//! seam between the synchronization pipeline / read facade and the engine's
//! wire protocol, so everything above it is testable against a fake.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::SearchIndexError;
use catalog_shared::{ProductDocument, SearchResults};

/// Abstracts the underlying search index implementation.
///
/// Implementations are thin, stateless adapters: no retries, no caching, no
/// business logic. They are injected into the pipeline and the read facade to
/// enable dependency injection and easy testing with mock implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the product index and its alias exist, creating them with the
    /// configured settings and mappings if necessary.
    ///
    /// Called during application startup so the backend is ready before any
    /// document operations.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Store the full document for a product, replacing any previous version.
    ///
    /// The document is always a complete projection of the product; there are
    /// no partial-field updates. Re-applying the same document is idempotent.
    async fn upsert_document(&self, document: &ProductDocument) -> Result<(), SearchIndexError>;

    /// Delete a product's document from the index.
    ///
    /// Deleting a document that does not exist is not an error.
    async fn delete_document(&self, product_id: &Uuid) -> Result<(), SearchIndexError>;

    /// Execute a structured query against the index.
    ///
    /// # Arguments
    ///
    /// * `body` - The query body (query + sort clauses)
    /// * `from` - Result offset
    /// * `size` - Page size
    async fn search(
        &self,
        body: &Value,
        from: i64,
        size: i64,
    ) -> Result<SearchResults, SearchIndexError>;
}
