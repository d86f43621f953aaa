//! Query builder for the product index.
//!
//! Pure translation of [`SearchFilters`] into a structured boolean query plus
//! sort clause. The output is deterministic: the same effective filters
//! always produce a byte-identical body, which the search cache fingerprint
//! relies on. Absent and empty filter values are omitted entirely.

use serde_json::{json, Map, Value};

use catalog_shared::SearchFilters;

/// Build the query body (query + sort) for a search request.
///
/// Pagination is not part of the body; the offset and page size are passed
/// separately to the provider's `search` call.
pub fn build_search_body(filters: &SearchFilters) -> Value {
    let mut must: Vec<Value> = Vec::new();

    if let Some(q) = filters.q() {
        must.push(json!({
            "multi_match": {
                "query": q,
                "fields": ["name^2", "description", "sku"],
            }
        }));
    }

    if let Some(category) = filters.category() {
        must.push(json!({ "term": { "category.keyword": category } }));
    }

    if let Some(status) = filters.status() {
        must.push(json!({ "term": { "status.keyword": status } }));
    }

    let (min_price, max_price) = filters.price_bounds();
    if min_price.is_some() || max_price.is_some() {
        let mut range = Map::new();
        if let Some(min) = min_price {
            range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = max_price {
            range.insert("lte".to_string(), json!(max));
        }
        must.push(json!({ "range": { "price": range } }));
    }

    if let Some(sku) = filters.sku() {
        must.push(json!({ "term": { "sku.keyword": sku } }));
    }

    if let Some(name) = filters.name() {
        must.push(json!({ "match": { "name": name } }));
    }

    if let Some(created_at) = filters.created_at() {
        must.push(json!({ "term": { "created_at": created_at } }));
    }

    let mut sort_clause = Map::new();
    sort_clause.insert(
        filters.sort_field().to_string(),
        json!({ "order": filters.sort_order() }),
    );

    json!({
        "query": { "bool": { "must": must } },
        "sort": [Value::Object(sort_clause)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_build_match_all_shape() {
        let body = build_search_body(&SearchFilters::default());

        assert_eq!(body["query"]["bool"]["must"], json!([]));
        assert_eq!(body["sort"], json!([{ "created_at": { "order": "desc" } }]));
    }

    #[test]
    fn test_full_text_clause() {
        let filters = SearchFilters {
            q: Some("widget".to_string()),
            ..Default::default()
        };
        let body = build_search_body(&filters);

        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({
                "multi_match": {
                    "query": "widget",
                    "fields": ["name^2", "description", "sku"],
                }
            })
        );
    }

    #[test]
    fn test_exact_term_clauses() {
        let filters = SearchFilters {
            sku: Some("A1".to_string()),
            category: Some("tools".to_string()),
            status: Some("active".to_string()),
            ..Default::default()
        };
        let body = build_search_body(&filters);
        let must = body["query"]["bool"]["must"].as_array().unwrap();

        assert_eq!(must.len(), 3);
        assert_eq!(must[0], json!({ "term": { "category.keyword": "tools" } }));
        assert_eq!(must[1], json!({ "term": { "status.keyword": "active" } }));
        assert_eq!(must[2], json!({ "term": { "sku.keyword": "A1" } }));
    }

    #[test]
    fn test_price_range_bounds_may_be_partial() {
        let min_only = SearchFilters {
            min_price: Some(5.0),
            ..Default::default()
        };
        let body = build_search_body(&min_only);
        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({ "range": { "price": { "gte": 5.0 } } })
        );

        let max_only = SearchFilters {
            max_price: Some(50.0),
            ..Default::default()
        };
        let body = build_search_body(&max_only);
        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({ "range": { "price": { "lte": 50.0 } } })
        );
    }

    #[test]
    fn test_price_shorthand_builds_identical_body() {
        let shorthand = SearchFilters {
            price: Some(20.0),
            ..Default::default()
        };
        let explicit = SearchFilters {
            min_price: Some(20.0),
            max_price: Some(20.0),
            ..Default::default()
        };

        let shorthand_body = build_search_body(&shorthand);
        let explicit_body = build_search_body(&explicit);

        assert_eq!(shorthand_body, explicit_body);
        // Byte-identical, not merely structurally equal.
        assert_eq!(shorthand_body.to_string(), explicit_body.to_string());
    }

    #[test]
    fn test_deterministic_for_equal_input() {
        let filters = SearchFilters {
            q: Some("drill".to_string()),
            category: Some("tools".to_string()),
            min_price: Some(10.0),
            sort: Some("price".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };

        let first = build_search_body(&filters).to_string();
        let second = build_search_body(&filters.clone()).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sort_clause_overrides() {
        let filters = SearchFilters {
            sort: Some("price".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };
        let body = build_search_body(&filters);
        assert_eq!(body["sort"], json!([{ "price": { "order": "asc" } }]));
    }

    #[test]
    fn test_empty_strings_omitted_from_body() {
        let filters = SearchFilters {
            q: Some(String::new()),
            sku: Some("   ".to_string()),
            ..Default::default()
        };
        let body = build_search_body(&filters);
        assert_eq!(body["query"]["bool"]["must"], json!([]));
    }
}
