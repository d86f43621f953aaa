//! # Catalog Store
//!
//! Authoritative relational persistence for catalog products.
//!
//! The store supports create / find / update / soft-delete and emits a
//! lifecycle notification onto an injected channel after every successful
//! mutation. The notification channel is an explicit injected dependency, not
//! a global event bus; the synchronization pipeline owns the receiving end.
//!
//! Two backends are provided behind the [`StoreBackend`] trait:
//!
//! - [`PostgresBackend`]: production storage on PostgreSQL
//! - [`MemoryBackend`]: in-memory storage for testing/development

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;
pub use store::{ProductStore, StoreBackend, StoreSource};
