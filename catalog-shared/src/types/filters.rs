//! Search filter types.
//!
//! [`SearchFilters`] is the sparse, user-supplied filter map for product
//! searches. It carries the recognized keys only; everything else is dropped
//! before it reaches this type. The struct owns the normalization rules that
//! both the query builder and the cache fingerprint depend on, so that two
//! equivalent requests produce the same query body and collapse onto the same
//! cache key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default page size when `per_page` is absent.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Default sort field when `sort` is absent.
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Deepest page for which search results are cached. Deeper pagination scans
/// bypass the cache entirely.
pub const MAX_CACHED_PAGE: u32 = 50;

/// Sparse filter map for a product search.
///
/// All fields are optional; absent and empty values are omitted from the
/// generated query entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    /// Weighted full-text query across name, description and SKU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Exact match on the SKU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Partial/analyzed match on the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact match on the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Exact match on the lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Inclusive lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Exact-price shorthand: when neither `min_price` nor `max_price` is
    /// given, sets both bounds to this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Exact match on the stored creation date string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Sort field, defaulting to the creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction: `asc`, anything else normalizes to `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// 1-based page number, default 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size, default 15.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Trim an optional string, treating whitespace-only values as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SearchFilters {
    pub fn q(&self) -> Option<&str> {
        non_empty(&self.q)
    }

    pub fn sku(&self) -> Option<&str> {
        non_empty(&self.sku)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(&self.status)
    }

    pub fn created_at(&self) -> Option<&str> {
        non_empty(&self.created_at)
    }

    /// The effective 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// The effective page size.
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1)
    }

    /// Result offset: `(page - 1) * per_page`.
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.per_page()
    }

    /// The effective sort field.
    pub fn sort_field(&self) -> &str {
        non_empty(&self.sort).unwrap_or(DEFAULT_SORT_FIELD)
    }

    /// The effective sort direction: `asc` only when requested exactly,
    /// everything else normalizes to `desc`.
    pub fn sort_order(&self) -> &'static str {
        match non_empty(&self.order) {
            Some("asc") => "asc",
            _ => "desc",
        }
    }

    /// Effective inclusive price bounds, with the exact-price shorthand
    /// expanded: when neither explicit bound is present, `price` sets both.
    pub fn price_bounds(&self) -> (Option<f64>, Option<f64>) {
        if self.min_price.is_none() && self.max_price.is_none() {
            if let Some(price) = self.price {
                return (Some(price), Some(price));
            }
        }
        (self.min_price, self.max_price)
    }

    /// Whether results for this request may be cached. Pages beyond
    /// [`MAX_CACHED_PAGE`] bypass the cache entirely.
    pub fn is_cacheable(&self) -> bool {
        self.page() <= MAX_CACHED_PAGE
    }

    /// Canonical sorted map of the effective filters.
    ///
    /// Absent and empty values are dropped, the price shorthand is expanded,
    /// and pagination/sort defaults are filled in, so that any two requests
    /// with the same effective meaning produce an identical map. This map is
    /// the input to the search cache fingerprint.
    pub fn canonical(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        if let Some(q) = self.q() {
            map.insert("q".to_string(), q.to_string());
        }
        if let Some(sku) = self.sku() {
            map.insert("sku".to_string(), sku.to_string());
        }
        if let Some(name) = self.name() {
            map.insert("name".to_string(), name.to_string());
        }
        if let Some(category) = self.category() {
            map.insert("category".to_string(), category.to_string());
        }
        if let Some(status) = self.status() {
            map.insert("status".to_string(), status.to_string());
        }
        let (min_price, max_price) = self.price_bounds();
        if let Some(min) = min_price {
            map.insert("min_price".to_string(), min.to_string());
        }
        if let Some(max) = max_price {
            map.insert("max_price".to_string(), max.to_string());
        }
        if let Some(created_at) = self.created_at() {
            map.insert("created_at".to_string(), created_at.to_string());
        }
        map.insert("sort".to_string(), self.sort_field().to_string());
        map.insert("order".to_string(), self.sort_order().to_string());
        map.insert("page".to_string(), self.page().to_string());
        map.insert("per_page".to_string(), self.per_page().to_string());

        map
    }
}
