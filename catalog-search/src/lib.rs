//! # Catalog Search
//!
//! This crate provides traits and implementations for interacting with the
//! product search index. It includes the provider trait, a concrete
//! OpenSearch implementation, the index settings and mappings, and the pure
//! query builder that translates sparse search filters into engine query
//! bodies.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod query;
pub mod response;

pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use query::build_search_body;
pub use response::parse_search_response;
pub use self::opensearch::{IndexConfig, OpenSearchProvider};
