//! Parsing of the search engine's response envelope.
//!
//! A search response arrives as `{hits: {total, hits: [{_source: doc}]}}`.
//! Depending on engine version `total` is either a bare number or an object
//! carrying `{value, relation}`; both forms are accepted.

use serde_json::Value;

use crate::errors::SearchIndexError;
use catalog_shared::{ProductDocument, SearchResults};

/// Parse a search response envelope into a result set.
pub fn parse_search_response(body: &Value) -> Result<SearchResults, SearchIndexError> {
    let hits_envelope = body
        .get("hits")
        .ok_or_else(|| SearchIndexError::parse("Response is missing the hits envelope"))?;

    let total = parse_total(hits_envelope.get("total"))?;

    let raw_hits = hits_envelope
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Response is missing the hits array"))?;

    let mut documents = Vec::with_capacity(raw_hits.len());
    for hit in raw_hits {
        let source = hit
            .get("_source")
            .ok_or_else(|| SearchIndexError::parse("Hit is missing _source"))?;
        let document: ProductDocument = serde_json::from_value(source.clone())
            .map_err(|e| SearchIndexError::parse(format!("Invalid hit document: {}", e)))?;
        documents.push(document);
    }

    Ok(SearchResults::new(documents, total))
}

/// `total` is `{value, relation}` on modern engines, a bare number on old
/// ones.
fn parse_total(total: Option<&Value>) -> Result<u64, SearchIndexError> {
    match total {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| SearchIndexError::parse("Negative hit total")),
        Some(Value::Object(obj)) => obj
            .get("value")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchIndexError::parse("Hit total object is missing value")),
        _ => Err(SearchIndexError::parse("Response is missing the hit total")),
    }
}
