//! Error types for the catalog facade.

use thiserror::Error;

use catalog_search::SearchIndexError;
use catalog_store::StoreError;

/// Errors surfaced by the catalog facade.
///
/// Not-found conditions are typed results (`Ok(None)` / `Ok(false)`) on the
/// operations themselves, never errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error from the entity store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the search index during a read.
    ///
    /// The read path does not swallow index errors: the caller is waiting
    /// synchronously and gets the failure.
    #[error("Search error: {0}")]
    Search(#[from] SearchIndexError),
}
