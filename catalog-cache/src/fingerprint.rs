//! Cache key construction.
//!
//! Single products cache under `product:<id>`. Search results cache under
//! `search:products:<digest>` where the digest is the SHA-256 of the
//! canonicalized filter map serialized as sorted JSON — so any two requests
//! with the same effective filters collapse onto one key.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use catalog_shared::SearchFilters;

/// Cache key for a single product lookup.
pub fn product_key(id: &Uuid) -> String {
    format!("product:{}", id)
}

/// Cache key for a search result set.
pub fn search_key(filters: &SearchFilters) -> String {
    let mut map = Map::new();
    for (key, value) in filters.canonical() {
        map.insert(key, Value::String(value));
    }
    let payload = Value::Object(map).to_string();

    let digest = Sha256::digest(payload.as_bytes());
    format!("search:products:{}", hex::encode(digest))
}
