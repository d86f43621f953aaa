//! High-level product store and backend trait.

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use uuid::Uuid;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::memory::MemoryBackend;
use crate::postgres::PostgresBackend;
use catalog_shared::{NewProduct, Product, PropagationTask, ProductUpdate};

/// Trait for product store backends.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Persist a fully constructed product.
    async fn insert(&self, product: &Product) -> Result<(), StoreError>;

    /// Find a product by id, excluding soft-deleted rows.
    async fn find(&self, id: &Uuid) -> Result<Option<Product>, StoreError>;

    /// Find a product by SKU, excluding soft-deleted rows.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Apply a partial update. Returns false if no live row matched.
    async fn update(&self, id: &Uuid, changes: &ProductUpdate) -> Result<bool, StoreError>;

    /// Mark a product deleted. Returns false if no live row matched.
    async fn soft_delete(&self, id: &Uuid) -> Result<bool, StoreError>;

    /// List live products, newest first, with offset pagination.
    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<Product>, StoreError>;
}

/// Configuration for the store backend.
///
/// Use this to explicitly choose between mock (in-memory) and live
/// (PostgreSQL) storage.
#[derive(Debug, Clone)]
pub enum StoreSource {
    /// Use in-memory storage for testing/development.
    Mock,

    /// Use PostgreSQL storage.
    Live {
        /// PostgreSQL connection URL
        database_url: String,
    },
}

impl StoreSource {
    /// Create a mock (in-memory) store source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live store source with the given PostgreSQL URL.
    pub fn live(database_url: impl Into<String>) -> Self {
        Self::Live {
            database_url: database_url.into(),
        }
    }

    /// Create the store with the appropriate backend.
    pub async fn into_store(self) -> Result<ProductStore, StoreError> {
        match self {
            Self::Mock => Ok(ProductStore::mock()),
            Self::Live { database_url } => {
                let backend = PostgresBackend::new(&database_url).await?;
                Ok(ProductStore::postgres(backend))
            }
        }
    }
}

/// High-level product store wrapping a storage backend.
///
/// Owns product construction and boundary validation, and emits a
/// [`PropagationTask`] on the injected notification channel after every
/// successful mutation. Emission never fails the caller: the store is the
/// source of truth, and a committed mutation is never rolled back because the
/// index pipeline is unavailable.
pub struct ProductStore {
    backend: Box<dyn StoreBackend>,
    events: Option<UnboundedSender<PropagationTask>>,
}

impl ProductStore {
    /// Create a store with in-memory storage (for testing).
    pub fn mock() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            events: None,
        }
    }

    /// Create a store with PostgreSQL storage.
    pub fn postgres(backend: PostgresBackend) -> Self {
        Self {
            backend: Box::new(backend),
            events: None,
        }
    }

    /// Attach the lifecycle notification channel.
    ///
    /// Every successful create/update emits an upsert task and every
    /// successful soft-delete emits a delete task on this channel.
    pub fn with_events(mut self, events: UnboundedSender<PropagationTask>) -> Self {
        self.events = Some(events);
        self
    }

    /// Create a product from validated fields.
    ///
    /// Generates the identifier and timestamps, defaults the status to
    /// active, persists the row and emits an upsert notification.
    pub async fn create(&self, fields: NewProduct) -> Result<Product, StoreError> {
        Self::validate(&fields)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            sku: fields.sku,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            status: fields.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.backend.insert(&product).await?;
        debug!(product_id = %product.id, sku = %product.sku, "Product created");

        self.emit(PropagationTask::upsert(product.id));
        Ok(product)
    }

    /// Find a product by id. Soft-deleted products are absent.
    pub async fn find(&self, id: &Uuid) -> Result<Option<Product>, StoreError> {
        self.backend.find(id).await
    }

    /// Find a product by its SKU. Soft-deleted products are absent.
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        self.backend.find_by_sku(sku).await
    }

    /// Apply a partial update to a product.
    ///
    /// Returns false when the product does not exist (or was soft-deleted);
    /// absence is a typed result, not an error. Emits an upsert notification
    /// on success.
    pub async fn update(&self, id: &Uuid, changes: ProductUpdate) -> Result<bool, StoreError> {
        if let Some(price) = changes.price {
            Self::validate_price(price)?;
        }

        let updated = self.backend.update(id, &changes).await?;
        if updated {
            debug!(product_id = %id, "Product updated");
            self.emit(PropagationTask::upsert(*id));
        }
        Ok(updated)
    }

    /// Soft-delete a product.
    ///
    /// Returns false when the product does not exist or is already deleted.
    /// Emits a delete notification on success.
    pub async fn soft_delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let deleted = self.backend.soft_delete(id).await?;
        if deleted {
            debug!(product_id = %id, "Product soft-deleted");
            self.emit(PropagationTask::delete(*id));
        }
        Ok(deleted)
    }

    /// List live products, newest first.
    pub async fn list(&self, page: u32, per_page: u32) -> Result<Vec<Product>, StoreError> {
        self.backend.list(page.max(1), per_page.max(1)).await
    }

    /// Push a propagation task onto the notification channel.
    ///
    /// Send failures are logged and swallowed; they never cross back into the
    /// mutation path.
    fn emit(&self, task: PropagationTask) {
        if let Some(events) = &self.events {
            if events.send(task).is_err() {
                warn!(
                    product_id = %task.product_id,
                    action = ?task.action,
                    "Dropped lifecycle notification: pipeline receiver is gone"
                );
            }
        }
    }

    fn validate(fields: &NewProduct) -> Result<(), StoreError> {
        if fields.sku.trim().is_empty() {
            return Err(StoreError::validation("sku is required"));
        }
        if fields.name.trim().is_empty() {
            return Err(StoreError::validation("name is required"));
        }
        Self::validate_price(fields.price)
    }

    fn validate_price(price: f64) -> Result<(), StoreError> {
        if !price.is_finite() || price < 0.0 {
            return Err(StoreError::validation("price must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_shared::SyncAction;
    use tokio::sync::mpsc;

    fn widget() -> NewProduct {
        NewProduct {
            sku: "A1".to_string(),
            name: "Widget".to_string(),
            description: Some("A fine widget".to_string()),
            price: 9.99,
            category: Some("tools".to_string()),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = ProductStore::mock();

        let created = store.create(widget()).await.unwrap();
        assert_eq!(created.sku, "A1");
        assert_eq!(created.status.as_str(), "active");

        let found = store.find(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let store = ProductStore::mock();

        let missing_sku = NewProduct {
            sku: "  ".to_string(),
            ..widget()
        };
        assert!(matches!(
            store.create(missing_sku).await,
            Err(StoreError::Validation(_))
        ));

        let negative_price = NewProduct {
            price: -1.0,
            ..widget()
        };
        assert!(matches!(
            store.create(negative_price).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_sku() {
        let store = ProductStore::mock();
        let created = store.create(widget()).await.unwrap();

        let found = store.find_by_sku("A1").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        assert!(store.find_by_sku("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_absent_product_is_typed_false() {
        let store = ProductStore::mock();
        let updated = store
            .update(&Uuid::new_v4(), ProductUpdate::default())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_product() {
        let store = ProductStore::mock();
        let created = store.create(widget()).await.unwrap();

        assert!(store.soft_delete(&created.id).await.unwrap());
        assert!(store.find(&created.id).await.unwrap().is_none());
        assert!(store.find_by_sku("A1").await.unwrap().is_none());

        // Second delete finds nothing.
        assert!(!store.soft_delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_mutations_emit_propagation_tasks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = ProductStore::mock().with_events(tx);

        let created = store.create(widget()).await.unwrap();
        let task = rx.recv().await.unwrap();
        assert_eq!(task.action, SyncAction::Upsert);
        assert_eq!(task.product_id, created.id);

        let changes = ProductUpdate {
            price: Some(19.99),
            ..Default::default()
        };
        assert!(store.update(&created.id, changes).await.unwrap());
        let task = rx.recv().await.unwrap();
        assert_eq!(task.action, SyncAction::Upsert);

        assert!(store.soft_delete(&created.id).await.unwrap());
        let task = rx.recv().await.unwrap();
        assert_eq!(task.action, SyncAction::Delete);
        assert_eq!(task.product_id, created.id);
    }

    #[tokio::test]
    async fn test_failed_mutation_emits_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = ProductStore::mock().with_events(tx);

        assert!(!store.soft_delete(&Uuid::new_v4()).await.unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_receiver_never_fails_mutation() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let store = ProductStore::mock().with_events(tx);

        // The send fails internally; the mutation still succeeds.
        let created = store.create(widget()).await.unwrap();
        assert!(store.find(&created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let store = ProductStore::mock();
        for i in 0..5 {
            let fields = NewProduct {
                sku: format!("SKU-{}", i),
                name: format!("Product {}", i),
                description: None,
                price: i as f64,
                category: None,
                status: None,
            };
            store.create(fields).await.unwrap();
        }

        let first_page = store.list(1, 2).await.unwrap();
        assert_eq!(first_page.len(), 2);
        let second_page = store.list(2, 2).await.unwrap();
        assert_eq!(second_page.len(), 2);
        assert_ne!(first_page[0].id, second_page[0].id);

        let all = store.list(1, 50).await.unwrap();
        assert_eq!(all.len(), 5);
    }
}
