//! Index document types.
//!
//! This module defines the document structure that is stored in the search
//! engine. The document is a projection of [`Product`] and is rebuilt in full
//! on every propagation; there are no partial-field updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::product::{Product, ProductStatus};

/// Date format used for timestamps in the search index.
///
/// The index mapping declares its date fields with the matching
/// `yyyy-MM-dd HH:mm:ss` engine format.
pub const INDEX_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Document representation of a product in the search index.
///
/// Derived, never authoritative. Timestamps are carried as index-native date
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDocument {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: ProductStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl ProductDocument {
    /// Project a product into its index document form.
    ///
    /// The projection is total: every propagation rebuilds the whole document
    /// from the product's current state.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            status: product.status,
            created_at: format_index_date(&product.created_at),
            updated_at: format_index_date(&product.updated_at),
        }
    }

    /// The document id used in the search index.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

/// Format a timestamp as an index-native date string.
pub fn format_index_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(INDEX_DATE_FORMAT).to_string()
}
