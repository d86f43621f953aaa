//! Interface definitions for search index providers.

pub mod search_index_provider;

pub use search_index_provider::SearchIndexProvider;
