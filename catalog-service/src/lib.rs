//! # Catalog Service
//!
//! Read/write facade for the product catalog. Composes the entity store, the
//! cache layer, the query builder and the search index client to answer read
//! requests, and routes mutations through the store while keeping the cache
//! honest.
//!
//! HTTP framing, request parsing and validation live outside this crate; the
//! facade exposes the typed operation surface they call into.

pub mod errors;
pub mod service;

pub use errors::ServiceError;
pub use service::CatalogService;
