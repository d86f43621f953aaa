//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    DeleteParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};
use url::Url;
use uuid::Uuid;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, get_versioned_index_name, IndexConfig};
use crate::response::parse_search_response;
use catalog_shared::{ProductDocument, SearchResults};

/// Default per-request timeout for index and search calls.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenSearch provider implementation.
///
/// Thin, stateless adapter over the engine's wire protocol: full-document
/// upsert via `PUT /{index}/_doc/{id}`, delete via `DELETE /{index}/_doc/{id}`
/// (missing documents are fine), and reads via `POST /{index}/_search`.
///
/// # Example
///
/// ```ignore
/// use catalog_search::opensearch::{IndexConfig, OpenSearchProvider};
///
/// let config = IndexConfig::new("products", 0);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config)?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
    request_timeout: Duration,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Settings body for index creation, with the alias attached so all
    /// operations can address the index by its stable name.
    fn creation_body(&self) -> Value {
        let mut body = get_index_settings(Some(self.index_config.version));
        if let Some(obj) = body.as_object_mut() {
            let mut aliases = Map::new();
            aliases.insert(self.index_config.alias.clone(), json!({}));
            obj.insert("aliases".to_string(), Value::Object(aliases));
        }
        body
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Ensure the versioned index and its alias exist, creating them with the
    /// product mappings if necessary.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let index_name = get_versioned_index_name(Some(self.index_config.version));

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index_name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(self.creation_body())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(
            index = %index_name,
            alias = %self.index_config.alias,
            "Created index with product mappings"
        );
        Ok(())
    }

    /// Store the full document for a product, replacing any previous version.
    async fn upsert_document(&self, document: &ProductDocument) -> Result<(), SearchIndexError> {
        let doc_id = document.document_id();

        let response = self
            .client
            .index(IndexParts::IndexId(&self.index_config.alias, &doc_id))
            .body(document)
            .request_timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    /// Delete a product's document. A missing document is not an error.
    async fn delete_document(&self, product_id: &Uuid) -> Result<(), SearchIndexError> {
        let doc_id = product_id.to_string();

        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.alias, &doc_id))
            .request_timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document deleted");
        Ok(())
    }

    /// Execute a structured query against the index.
    async fn search(
        &self,
        body: &Value,
        from: i64,
        size: i64,
    ) -> Result<SearchResults, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_config.alias]))
            .from(from)
            .size(size)
            .body(body)
            .request_timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let envelope = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        parse_search_response(&envelope)
    }
}
