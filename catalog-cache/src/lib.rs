//! # Catalog Cache
//!
//! Read-through caching for catalog reads: single-product lookups and search
//! result sets.
//!
//! Entries carry a jittered TTL drawn from a fixed window so that entries
//! written together do not expire together. Group invalidation is a
//! generation counter: flushing does not iterate keys, it increments the
//! cache's generation, and entries stored under an older generation are
//! treated as gone.

pub mod cache;
pub mod fingerprint;

pub use cache::{TtlCache, TtlConfig};
pub use fingerprint::{product_key, search_key};
