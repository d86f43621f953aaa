//! Loader: applies processed tasks to the search index.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::IngestError;
use crate::processor::ProcessedTask;
use catalog_search::SearchIndexProvider;

/// Loader that writes propagation results into the search engine.
///
/// Thin by design: error policy (log and drop, no retry) lives in the
/// orchestrator's worker boundary, not here.
#[derive(Clone)]
pub struct SearchLoader {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchLoader {
    /// Create a new loader over the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Apply a single processed task to the index.
    #[instrument(skip(self, task))]
    pub async fn apply(&self, task: ProcessedTask) -> Result<(), IngestError> {
        match task {
            ProcessedTask::Upsert(document) => {
                let doc_id = document.document_id();
                self.provider.upsert_document(&document).await?;
                debug!(doc_id = %doc_id, "Applied upsert");
            }
            ProcessedTask::Delete(product_id) => {
                self.provider.delete_document(&product_id).await?;
                debug!(product_id = %product_id, "Applied delete");
            }
        }
        Ok(())
    }

    /// Check that the index is ready to receive documents, creating it if
    /// needed.
    pub async fn check_ready(&self) -> Result<(), IngestError> {
        self.provider.ensure_index_exists().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    use catalog_search::SearchIndexError;
    use catalog_shared::{Product, ProductDocument, ProductStatus, SearchResults};

    /// Mock search provider for testing.
    struct MockSearchProvider {
        documents: Mutex<HashMap<Uuid, ProductDocument>>,
        fail_upserts: bool,
    }

    impl MockSearchProvider {
        fn new() -> Self {
            Self {
                documents: Mutex::new(HashMap::new()),
                fail_upserts: false,
            }
        }

        fn failing() -> Self {
            Self {
                documents: Mutex::new(HashMap::new()),
                fail_upserts: true,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn upsert_document(
            &self,
            document: &ProductDocument,
        ) -> Result<(), SearchIndexError> {
            if self.fail_upserts {
                return Err(SearchIndexError::index("mock failure"));
            }
            self.documents
                .lock()
                .unwrap()
                .insert(document.id, document.clone());
            Ok(())
        }

        async fn delete_document(&self, product_id: &Uuid) -> Result<(), SearchIndexError> {
            // Deleting a missing document is fine.
            self.documents.lock().unwrap().remove(product_id);
            Ok(())
        }

        async fn search(
            &self,
            _body: &Value,
            _from: i64,
            _size: i64,
        ) -> Result<SearchResults, SearchIndexError> {
            let documents = self.documents.lock().unwrap();
            let hits: Vec<ProductDocument> = documents.values().cloned().collect();
            let total = hits.len() as u64;
            Ok(SearchResults::new(hits, total))
        }
    }

    fn test_document() -> ProductDocument {
        let now = chrono::Utc::now();
        ProductDocument::from_product(&Product {
            id: Uuid::new_v4(),
            sku: "A1".to_string(),
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            category: None,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    #[tokio::test]
    async fn test_apply_upsert_and_delete() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = SearchLoader::new(provider.clone());
        let document = test_document();
        let id = document.id;

        loader.apply(ProcessedTask::Upsert(document)).await.unwrap();
        assert!(provider.documents.lock().unwrap().contains_key(&id));

        loader.apply(ProcessedTask::Delete(id)).await.unwrap();
        assert!(!provider.documents.lock().unwrap().contains_key(&id));
    }

    #[tokio::test]
    async fn test_delete_for_missing_document_is_not_an_error() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = SearchLoader::new(provider);

        loader
            .apply(ProcessedTask::Delete(Uuid::new_v4()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_to_worker_boundary() {
        let provider = Arc::new(MockSearchProvider::failing());
        let loader = SearchLoader::new(provider);

        let result = loader.apply(ProcessedTask::Upsert(test_document())).await;
        assert!(matches!(result, Err(IngestError::IndexError(_))));
    }
}
