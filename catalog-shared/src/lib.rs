//! # Catalog Shared
//!
//! This crate defines shared data structures and types used across the catalog
//! search system. It includes the product record, the index document projection,
//! search filters, search results, and the propagation task that flows through
//! the synchronization pipeline.

pub mod types;

pub use types::document::ProductDocument;
pub use types::filters::SearchFilters;
pub use types::product::{NewProduct, Product, ProductStatus, ProductUpdate};
pub use types::results::SearchResults;
pub use types::task::{PropagationTask, SyncAction};
