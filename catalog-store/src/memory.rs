//! In-memory store backend for testing/development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::StoreBackend;
use catalog_shared::{Product, ProductUpdate};

/// In-memory storage backend.
///
/// Mirrors the PostgreSQL backend's behavior, including SKU uniqueness among
/// live rows and soft-delete visibility rules.
pub struct MemoryBackend {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.write().unwrap();

        let duplicate = products
            .values()
            .any(|p| p.deleted_at.is_none() && p.sku == product.sku);
        if duplicate {
            return Err(StoreError::conflict(format!(
                "sku '{}' already exists",
                product.sku
            )));
        }

        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().unwrap();
        Ok(products
            .get(id)
            .filter(|p| p.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().unwrap();
        Ok(products
            .values()
            .find(|p| p.deleted_at.is_none() && p.sku == sku)
            .cloned())
    }

    async fn update(&self, id: &Uuid, changes: &ProductUpdate) -> Result<bool, StoreError> {
        let mut products = self.products.write().unwrap();

        let Some(product) = products.get_mut(id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(false);
        };

        if let Some(sku) = &changes.sku {
            product.sku = sku.clone();
        }
        if let Some(name) = &changes.name {
            product.name = name.clone();
        }
        if let Some(description) = &changes.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(category) = &changes.category {
            product.category = Some(category.clone());
        }
        if let Some(status) = changes.status {
            product.status = status;
        }
        product.updated_at = Utc::now();

        Ok(true)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().unwrap();

        let Some(product) = products.get_mut(id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(false);
        };

        product.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().unwrap();

        let mut live: Vec<Product> = products
            .values()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect();
        // Newest first, id as a stable tiebreak.
        live.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let offset = ((page - 1) * per_page) as usize;
        Ok(live
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect())
    }
}
