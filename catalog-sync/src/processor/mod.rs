//! Task processor: apply-time re-fetch and document projection.
//!
//! The processor turns a propagation task into the concrete index operation
//! to perform. Upserts re-fetch the product from the store at apply time
//! rather than shipping a snapshot from enqueue time: whatever state the
//! re-fetch observes is a valid, internally consistent document, so
//! re-applying or reordering tasks can leave the index behind but never torn.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::errors::IngestError;
use catalog_shared::{ProductDocument, PropagationTask, SyncAction};
use catalog_store::ProductStore;

/// Concrete index operation produced from a propagation task.
#[derive(Debug)]
pub enum ProcessedTask {
    /// Full document to be written to the index.
    Upsert(ProductDocument),
    /// Document to be removed from the index.
    Delete(Uuid),
}

/// Processor that resolves propagation tasks against the entity store.
#[derive(Clone)]
pub struct TaskProcessor {
    store: Arc<ProductStore>,
}

impl TaskProcessor {
    /// Create a new processor reading from the given store.
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }

    /// Resolve a single task.
    ///
    /// Returns `Ok(None)` when an upsert's product no longer exists (deleted
    /// between enqueue and apply): the task is dropped silently, since the
    /// delete notification that made it vanish carries its own task.
    pub async fn process(
        &self,
        task: PropagationTask,
    ) -> Result<Option<ProcessedTask>, IngestError> {
        match task.action {
            SyncAction::Upsert => match self.store.find(&task.product_id).await? {
                Some(product) => Ok(Some(ProcessedTask::Upsert(ProductDocument::from_product(
                    &product,
                )))),
                None => {
                    debug!(
                        product_id = %task.product_id,
                        "Skipping upsert for vanished product"
                    );
                    Ok(None)
                }
            },
            SyncAction::Delete => Ok(Some(ProcessedTask::Delete(task.product_id))),
        }
    }
}
