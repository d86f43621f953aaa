//! The propagation task queue.
//!
//! The queue is the explicit notification channel between the entity store
//! and the pipeline: the store holds a [`SyncHandle`] (the sending half) as an
//! injected dependency, and the orchestrator drains the [`SyncQueue`]
//! (the receiving half). There is no global event bus.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use catalog_shared::PropagationTask;

/// Sending half of the propagation channel.
///
/// Enqueueing is non-blocking and never fails the caller: if the pipeline's
/// receiver is gone the task is logged and dropped, because a committed store
/// mutation must not be failed by index plumbing.
#[derive(Clone)]
pub struct SyncHandle {
    sender: UnboundedSender<PropagationTask>,
}

impl SyncHandle {
    /// Enqueue a propagation task. Never blocks, never errors.
    pub fn enqueue(&self, task: PropagationTask) {
        if self.sender.send(task).is_err() {
            warn!(
                product_id = %task.product_id,
                action = ?task.action,
                "Dropped propagation task: queue receiver is gone"
            );
        }
    }

    /// A clone of the raw sender, for wiring into the entity store's
    /// notification slot.
    pub fn sender(&self) -> UnboundedSender<PropagationTask> {
        self.sender.clone()
    }
}

/// Receiving half of the propagation channel, owned by the orchestrator.
pub struct SyncQueue {
    receiver: UnboundedReceiver<PropagationTask>,
}

impl SyncQueue {
    /// Create a connected handle/queue pair.
    pub fn channel() -> (SyncHandle, SyncQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (SyncHandle { sender }, SyncQueue { receiver })
    }

    /// Receive the next task. Returns `None` once every handle is dropped and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<PropagationTask> {
        self.receiver.recv().await
    }
}
