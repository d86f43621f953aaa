//! Dependency initialization and wiring for the synchronization pipeline.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::loader::SearchLoader;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::TaskProcessor;
use crate::queue::{SyncHandle, SyncQueue};
use crate::IndexingError;
use catalog_search::opensearch::IndexConfig;
use catalog_search::{OpenSearchProvider, SearchIndexProvider};
use catalog_store::{ProductStore, StoreSource};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index alias.
const DEFAULT_INDEX_ALIAS: &str = "products";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every 15 seconds until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        match env::var("OPENSEARCH_CONNECTION_MODE")
            .unwrap_or_else(|_| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Enqueue handle for the propagation channel.
    pub handle: SyncHandle,
    /// The shared entity store, wired to emit into the channel.
    pub store: Arc<ProductStore>,
    /// The shared search index provider.
    pub provider: Arc<dyn SearchIndexProvider>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection URL; when unset an in-memory
    ///   store is used
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_ALIAS`: Index alias name (default: "products")
    /// - `PRODUCTS_INDEX_VERSION`: Index version number (default: 0)
    /// - `SYNC_MAX_CONCURRENCY`: Worker pool size (default: 4)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub async fn new() -> Result<Self, IndexingError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env::var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        let index_alias =
            env::var("INDEX_ALIAS").unwrap_or_else(|_| DEFAULT_INDEX_ALIAS.to_string());
        let index_version = env::var("PRODUCTS_INDEX_VERSION")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let index_config = IndexConfig::new(index_alias, index_version);

        info!(
            opensearch_url = %opensearch_url,
            alias = %index_config.alias,
            version = index_config.version,
            connection_mode = ?connection_mode,
            retry_interval_secs = retry_interval,
            "Initializing dependencies"
        );

        // Initialize OpenSearch provider with retry logic
        let provider = Self::connect_to_opensearch(
            &opensearch_url,
            index_config,
            connection_mode,
            Duration::from_secs(retry_interval),
        )
        .await?;
        let provider: Arc<dyn SearchIndexProvider> = Arc::new(provider);

        info!("OpenSearch connection established");

        // Ensure index and alias exist (validate and create if not exists)
        provider
            .ensure_index_exists()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to ensure index exists: {}", e)))?;

        // The propagation channel: the store gets the sending half, the
        // orchestrator drains the receiving half.
        let (handle, queue) = SyncQueue::channel();

        let store_source = match env::var("DATABASE_URL") {
            Ok(database_url) => StoreSource::live(database_url),
            Err(_) => {
                warn!("DATABASE_URL not set, using in-memory product store");
                StoreSource::mock()
            }
        };
        let store = store_source
            .into_store()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create product store: {}", e)))?
            .with_events(handle.sender());
        let store = Arc::new(store);

        info!("Product store created");

        let processor = TaskProcessor::new(Arc::clone(&store));
        let loader = SearchLoader::new(Arc::clone(&provider));

        let orchestrator_config = OrchestratorConfig {
            max_concurrency: env::var("SYNC_MAX_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or_else(|| OrchestratorConfig::default().max_concurrency),
            ..OrchestratorConfig::default()
        };
        let orchestrator = Orchestrator::with_config(queue, processor, loader, orchestrator_config);

        Ok(Self {
            orchestrator,
            handle,
            store,
            provider,
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match OpenSearchProvider::new(url, index_config.clone()) {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
