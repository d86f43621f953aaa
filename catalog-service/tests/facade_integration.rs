//! Integration tests for the catalog facade.
//!
//! These tests exercise the cache orchestration rules against the in-memory
//! store and a mock SearchIndexProvider: read-through caching, immediate
//! single-key eviction, full search-group flush, and the deep-pagination
//! cache bypass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{sleep, timeout};
use uuid::Uuid;

use catalog_search::{SearchIndexError, SearchIndexProvider};
use catalog_service::{CatalogService, ServiceError};
use catalog_shared::{NewProduct, ProductDocument, ProductUpdate, SearchFilters, SearchResults};
use catalog_store::ProductStore;

/// Mock search provider that records documents and counts search calls.
struct MockSearchProvider {
    documents: Mutex<HashMap<Uuid, ProductDocument>>,
    search_calls: AtomicUsize,
    fail_searches: bool,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            search_calls: AtomicUsize::new(0),
            fail_searches: false,
        }
    }

    fn failing() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            search_calls: AtomicUsize::new(0),
            fail_searches: true,
        }
    }

    fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn upsert_document(&self, document: &ProductDocument) -> Result<(), SearchIndexError> {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn delete_document(&self, product_id: &Uuid) -> Result<(), SearchIndexError> {
        self.documents.lock().unwrap().remove(product_id);
        Ok(())
    }

    async fn search(
        &self,
        _body: &Value,
        _from: i64,
        _size: i64,
    ) -> Result<SearchResults, SearchIndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_searches {
            return Err(SearchIndexError::search("mock engine down"));
        }
        let documents = self.documents.lock().unwrap();
        let hits: Vec<ProductDocument> = documents.values().cloned().collect();
        let total = hits.len() as u64;
        Ok(SearchResults::new(hits, total))
    }
}

fn widget(sku: &str) -> NewProduct {
    NewProduct {
        sku: sku.to_string(),
        name: format!("Widget {}", sku),
        description: None,
        price: 9.99,
        category: Some("tools".to_string()),
        status: None,
    }
}

fn service_with(provider: Arc<MockSearchProvider>) -> (CatalogService, Arc<ProductStore>) {
    let store = Arc::new(ProductStore::mock());
    let service = CatalogService::new(
        Arc::clone(&store),
        provider as Arc<dyn SearchIndexProvider>,
    );
    (service, store)
}

#[tokio::test]
async fn test_create_then_get_by_id_is_fresh() {
    let (service, _store) = service_with(Arc::new(MockSearchProvider::new()));

    let created = service.create(widget("A1")).await.unwrap();
    let found = service.get_by_id(&created.id).await.unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.price, 9.99);
}

#[tokio::test]
async fn test_get_by_id_is_read_through_cached() {
    let (service, store) = service_with(Arc::new(MockSearchProvider::new()));

    let created = service.create(widget("A1")).await.unwrap();
    // Prime the cache.
    service.get_by_id(&created.id).await.unwrap().unwrap();

    // Mutate through the store directly, bypassing the facade's eviction:
    // the cached copy is still served.
    let changes = ProductUpdate {
        price: Some(42.0),
        ..Default::default()
    };
    store.update(&created.id, changes).await.unwrap();

    let cached = service.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(cached.price, 9.99);
}

#[tokio::test]
async fn test_update_evicts_product_key_immediately() {
    let (service, _store) = service_with(Arc::new(MockSearchProvider::new()));

    let created = service.create(widget("A1")).await.unwrap();
    service.get_by_id(&created.id).await.unwrap().unwrap();

    let changes = ProductUpdate {
        price: Some(19.99),
        ..Default::default()
    };
    assert!(service.update(&created.id, changes).await.unwrap());

    // The pre-mutation value must never be served again.
    let found = service.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found.price, 19.99);
}

#[tokio::test]
async fn test_soft_delete_makes_product_not_found() {
    let (service, _store) = service_with(Arc::new(MockSearchProvider::new()));

    let created = service.create(widget("A1")).await.unwrap();
    service.get_by_id(&created.id).await.unwrap().unwrap();

    assert!(service.soft_delete(&created.id).await.unwrap());
    assert!(service.get_by_id(&created.id).await.unwrap().is_none());

    // Absence is typed, not an error.
    assert!(!service.soft_delete(&created.id).await.unwrap());
}

#[tokio::test]
async fn test_search_results_are_cached_per_fingerprint() {
    let provider = Arc::new(MockSearchProvider::new());
    let (service, _store) = service_with(provider.clone());

    let filters = SearchFilters {
        q: Some("widget".to_string()),
        ..Default::default()
    };

    service.search(&filters).await.unwrap();
    service.search(&filters).await.unwrap();
    assert_eq!(provider.search_calls(), 1);

    // Equivalent filters collapse onto the same cache entry.
    let shorthand = SearchFilters {
        price: Some(20.0),
        ..Default::default()
    };
    let explicit = SearchFilters {
        min_price: Some(20.0),
        max_price: Some(20.0),
        ..Default::default()
    };
    service.search(&shorthand).await.unwrap();
    service.search(&explicit).await.unwrap();
    assert_eq!(provider.search_calls(), 2);
}

#[tokio::test]
async fn test_any_mutation_flushes_every_cached_search() {
    let provider = Arc::new(MockSearchProvider::new());
    let (service, _store) = service_with(provider.clone());

    let first = service.create(widget("A1")).await.unwrap();

    let by_text = SearchFilters {
        q: Some("widget".to_string()),
        ..Default::default()
    };
    let by_category = SearchFilters {
        category: Some("tools".to_string()),
        ..Default::default()
    };
    service.search(&by_text).await.unwrap();
    service.search(&by_category).await.unwrap();
    assert_eq!(provider.search_calls(), 2);

    // A mutation of a *different* product still flushes the whole group.
    service.create(widget("B2")).await.unwrap();
    service.search(&by_text).await.unwrap();
    service.search(&by_category).await.unwrap();
    assert_eq!(provider.search_calls(), 4);

    // And so does an update of the first product.
    let changes = ProductUpdate {
        price: Some(19.99),
        ..Default::default()
    };
    service.update(&first.id, changes).await.unwrap();
    service.search(&by_text).await.unwrap();
    assert_eq!(provider.search_calls(), 5);
}

#[tokio::test]
async fn test_deep_pages_bypass_the_cache() {
    let provider = Arc::new(MockSearchProvider::new());
    let (service, _store) = service_with(provider.clone());

    let page_51 = SearchFilters {
        page: Some(51),
        ..Default::default()
    };
    service.search(&page_51).await.unwrap();
    service.search(&page_51).await.unwrap();
    // Never cached, regardless of repetition.
    assert_eq!(provider.search_calls(), 2);

    let page_50 = SearchFilters {
        page: Some(50),
        ..Default::default()
    };
    service.search(&page_50).await.unwrap();
    service.search(&page_50).await.unwrap();
    assert_eq!(provider.search_calls(), 3);
}

#[tokio::test]
async fn test_search_failures_surface_and_are_not_cached() {
    let provider = Arc::new(MockSearchProvider::failing());
    let (service, _store) = service_with(provider.clone());

    let filters = SearchFilters::default();

    let result = service.search(&filters).await;
    assert!(matches!(result, Err(ServiceError::Search(_))));

    // The failure was not cached: the next read hits the engine again.
    let result = service.search(&filters).await;
    assert!(matches!(result, Err(ServiceError::Search(_))));
    assert_eq!(provider.search_calls(), 2);
}

#[tokio::test]
async fn test_create_becomes_searchable_once_pipeline_applies() {
    use catalog_sync::loader::SearchLoader;
    use catalog_sync::orchestrator::Orchestrator;
    use catalog_sync::processor::TaskProcessor;
    use catalog_sync::SyncQueue;

    let provider = Arc::new(MockSearchProvider::new());
    let (handle, queue) = SyncQueue::channel();
    let store = Arc::new(ProductStore::mock().with_events(handle.sender()));
    let service = CatalogService::new(
        Arc::clone(&store),
        provider.clone() as Arc<dyn SearchIndexProvider>,
    );

    let processor = TaskProcessor::new(Arc::clone(&store));
    let loader = SearchLoader::new(provider.clone() as Arc<dyn SearchIndexProvider>);
    let mut orchestrator = Orchestrator::new(queue, processor, loader);
    let worker = tokio::spawn(async move { orchestrator.run().await });

    // The write is immediately visible through the store...
    let created = service.create(widget("A1")).await.unwrap();
    let found = service.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found.sku, "A1");

    // ...and eventually applied to the index by the pipeline.
    timeout(Duration::from_secs(2), async {
        while !provider.documents.lock().unwrap().contains_key(&created.id) {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("pipeline never applied the create");

    // Nothing searched since the create, so this read misses the cache, hits
    // the engine and sees the freshly applied document.
    let filters = SearchFilters {
        q: Some("Widget".to_string()),
        ..Default::default()
    };
    let results = service.search(&filters).await.unwrap();
    assert!(results.hits.iter().any(|doc| doc.id == created.id));

    worker.abort();
}
