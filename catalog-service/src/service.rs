//! The catalog facade.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use catalog_cache::{product_key, search_key, TtlCache, TtlConfig};
use catalog_search::{build_search_body, SearchIndexProvider};
use catalog_shared::{NewProduct, Product, ProductUpdate, SearchFilters, SearchResults};
use catalog_store::ProductStore;

/// Read/write facade over the catalog.
///
/// Reads go through the cache layer: single products under `product:<id>`
/// with immediate single-key eviction, search results under their filter
/// fingerprint with full group flush on any mutation. Mutations pass through
/// the store (which emits the propagation task for the index pipeline) and
/// evict synchronously before returning, so no cache entry survives a
/// completed write.
pub struct CatalogService {
    store: Arc<ProductStore>,
    provider: Arc<dyn SearchIndexProvider>,
    product_cache: TtlCache<Product>,
    search_cache: TtlCache<SearchResults>,
}

impl CatalogService {
    /// Create a facade with the default 60-120s cache TTL window.
    pub fn new(store: Arc<ProductStore>, provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_cache_config(store, provider, TtlConfig::default())
    }

    /// Create a facade with a custom cache TTL window.
    pub fn with_cache_config(
        store: Arc<ProductStore>,
        provider: Arc<dyn SearchIndexProvider>,
        cache_config: TtlConfig,
    ) -> Self {
        Self {
            store,
            provider,
            product_cache: TtlCache::with_config(cache_config.clone()),
            search_cache: TtlCache::with_config(cache_config),
        }
    }

    /// Search the product index with the given filters.
    ///
    /// Results for pages within the cacheable depth are remembered under the
    /// filter fingerprint; deeper pages go straight to the engine every time.
    /// Index failures surface to the caller.
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResults, ServiceError> {
        let body = build_search_body(filters);
        let from = filters.offset() as i64;
        let size = filters.per_page() as i64;

        if !filters.is_cacheable() {
            debug!(page = filters.page(), "Deep page search bypasses the cache");
            return Ok(self.provider.search(&body, from, size).await?);
        }

        let key = search_key(filters);
        let provider = Arc::clone(&self.provider);
        let results = self
            .search_cache
            .get_or_load(&key, || async move {
                provider.search(&body, from, size).await
            })
            .await?;
        Ok(results)
    }

    /// Fetch a product by id, read-through cached.
    ///
    /// Absence is a typed result; only found products are cached.
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Product>, ServiceError> {
        let key = product_key(id);
        if let Some(product) = self.product_cache.get(&key) {
            return Ok(Some(product));
        }

        match self.store.find(id).await? {
            Some(product) => {
                self.product_cache.put(key, product.clone());
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    /// Fetch a product by SKU, straight from the store.
    pub async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, ServiceError> {
        Ok(self.store.find_by_sku(sku).await?)
    }

    /// List live products from the store, newest first.
    pub async fn list(&self, page: u32, per_page: u32) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list(page, per_page).await?)
    }

    /// Create a product.
    ///
    /// The store emits the index propagation task; this method evicts the
    /// affected cache entries before returning.
    pub async fn create(&self, fields: NewProduct) -> Result<Product, ServiceError> {
        let product = self.store.create(fields).await?;
        self.invalidate(&product.id);
        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// Returns `Ok(false)` when the product does not exist. Cache entries are
    /// evicted only when the update actually happened.
    pub async fn update(&self, id: &Uuid, changes: ProductUpdate) -> Result<bool, ServiceError> {
        let updated = self.store.update(id, changes).await?;
        if updated {
            self.invalidate(id);
        }
        Ok(updated)
    }

    /// Soft-delete a product.
    ///
    /// Returns `Ok(false)` when the product does not exist or is already
    /// deleted.
    pub async fn soft_delete(&self, id: &Uuid) -> Result<bool, ServiceError> {
        let deleted = self.store.soft_delete(id).await?;
        if deleted {
            self.invalidate(id);
        }
        Ok(deleted)
    }

    /// Evict everything a mutation can make stale: the product's own key, and
    /// the whole search-result group (any result set could contain the
    /// mutated product, so precision is traded for a single O(1) flush).
    fn invalidate(&self, id: &Uuid) {
        self.product_cache.forget(&product_key(id));
        self.search_cache.flush();
    }
}
