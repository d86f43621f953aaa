//! Search result types.
//!
//! Defines the result set returned from search operations.

use serde::{Deserialize, Serialize};

use crate::types::document::ProductDocument;

/// Result set from a search against the product index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    /// The matching documents for the requested page, in engine order.
    pub hits: Vec<ProductDocument>,

    /// Total number of matching documents. May be greater than the number of
    /// returned hits due to pagination.
    pub total: u64,
}

impl SearchResults {
    /// Create an empty result set.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
        }
    }

    /// Create a new result set.
    pub fn new(hits: Vec<ProductDocument>, total: u64) -> Self {
        Self { hits, total }
    }

    /// Returns true if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of hits in this page of results.
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
