//! Propagation task types.
//!
//! A propagation task is the unit of work that flows from the entity store to
//! the synchronization pipeline: "make the index reflect this product's
//! current state (or its absence)". Tasks carry the identifier only; the
//! pipeline re-fetches the product at apply time, so an applied upsert always
//! reflects a valid state rather than a stale enqueue-time snapshot.

use uuid::Uuid;

/// The kind of index propagation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Re-index the product from its current stored state.
    Upsert,
    /// Remove the product's document from the index.
    Delete,
}

/// A unit of index propagation work.
///
/// Created at the moment of a committed mutation, consumed at most once per
/// enqueue, never persisted beyond the queue. Carries no retry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationTask {
    pub action: SyncAction,
    pub product_id: Uuid,
}

impl PropagationTask {
    /// Create an upsert task for a product.
    pub fn upsert(product_id: Uuid) -> Self {
        Self {
            action: SyncAction::Upsert,
            product_id,
        }
    }

    /// Create a delete task for a product.
    pub fn delete(product_id: Uuid) -> Self {
        Self {
            action: SyncAction::Delete,
            product_id,
        }
    }
}
