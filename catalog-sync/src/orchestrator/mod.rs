//! Orchestrator module for the synchronization pipeline.
//!
//! Coordinates the queue, processor, and loader components and runs the
//! worker pool that applies propagation tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Semaphore};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, instrument};

use crate::errors::IngestError;
use crate::loader::SearchLoader;
use crate::processor::TaskProcessor;
use crate::queue::SyncQueue;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of tasks applied concurrently.
    pub max_concurrency: usize,
    /// Interval between progress log lines.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Orchestrator that coordinates the pipeline components.
///
/// The orchestrator:
/// - Drains the propagation queue
/// - Applies tasks on a semaphore-bounded worker pool
/// - Handles shutdown signals
/// - Monitors pipeline health
///
/// Tasks for different products apply concurrently with no coordination, and
/// even tasks for the same product are not serialized: the processor's
/// apply-time re-fetch means the index can transiently show an older valid
/// state, never a torn one.
pub struct Orchestrator {
    queue: SyncQueue,
    processor: TaskProcessor,
    loader: SearchLoader,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
    /// Total number of tasks received since startup.
    total_tasks_received: Arc<AtomicU64>,
    /// Total number of tasks applied to the index since startup.
    total_tasks_applied: Arc<AtomicU64>,
    /// Total number of tasks dropped after a failure since startup.
    total_tasks_dropped: Arc<AtomicU64>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(queue: SyncQueue, processor: TaskProcessor, loader: SearchLoader) -> Self {
        Self::with_config(queue, processor, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        queue: SyncQueue,
        processor: TaskProcessor,
        loader: SearchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            queue,
            processor,
            loader,
            config,
            shutdown_tx,
            total_tasks_received: Arc::new(AtomicU64::new(0)),
            total_tasks_applied: Arc::new(AtomicU64::new(0)),
            total_tasks_dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the orchestrator.
    ///
    /// Blocks until the queue closes (every handle dropped and the backlog
    /// drained), a shutdown is requested, or ctrl-c arrives. In-flight
    /// applies are awaited before returning.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), IngestError> {
        info!("Starting catalog sync orchestrator");

        // Make sure the index exists before applying anything to it.
        self.loader.check_ready().await?;

        let processor = self.processor.clone();
        let loader = self.loader.clone();
        let shutdown_tx = self.shutdown_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));

        let total_received = Arc::clone(&self.total_tasks_received);
        let total_applied = Arc::clone(&self.total_tasks_applied);
        let total_dropped = Arc::clone(&self.total_tasks_dropped);

        let mut progress_timer = interval(self.config.progress_interval);
        progress_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Track previous values for rate calculation
        let mut prev_received: u64 = 0;
        let mut prev_time = std::time::Instant::now();

        info!(
            max_concurrency = self.config.max_concurrency,
            "Ready to apply propagation tasks"
        );

        loop {
            tokio::select! {
                maybe_task = self.queue.recv() => {
                    let Some(task) = maybe_task else {
                        info!("Propagation queue closed");
                        break;
                    };

                    total_received.fetch_add(1, Ordering::Relaxed);

                    let permit = match Arc::clone(&semaphore).acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => break,
                    };

                    let processor = processor.clone();
                    let loader = loader.clone();
                    let applied = Arc::clone(&total_applied);
                    let dropped = Arc::clone(&total_dropped);

                    tokio::spawn(async move {
                        let _permit = permit;
                        match processor.process(task).await {
                            Ok(Some(processed)) => match loader.apply(processed).await {
                                Ok(()) => {
                                    applied.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(e) => {
                                    // No retry, no dead-letter: the task is
                                    // dropped and the index stays behind
                                    // until the next mutation of this product.
                                    error!(
                                        product_id = %task.product_id,
                                        action = ?task.action,
                                        error = %e,
                                        "Dropping task after index failure"
                                    );
                                    dropped.fetch_add(1, Ordering::Relaxed);
                                }
                            },
                            Ok(None) => {
                                debug!(
                                    product_id = %task.product_id,
                                    "Task resolved to a no-op"
                                );
                            }
                            Err(e) => {
                                error!(
                                    product_id = %task.product_id,
                                    action = ?task.action,
                                    error = %e,
                                    "Dropping task after store failure"
                                );
                                dropped.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    let _ = shutdown_tx.send(());
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = progress_timer.tick() => {
                    let received = total_received.load(Ordering::Relaxed);
                    let applied = total_applied.load(Ordering::Relaxed);
                    let dropped = total_dropped.load(Ordering::Relaxed);

                    let now = std::time::Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();
                    let tasks_per_sec = if elapsed_secs > 0.0 {
                        (received.saturating_sub(prev_received) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        tasks_received = received,
                        tasks_applied = applied,
                        tasks_dropped = dropped,
                        tasks_per_sec = format!("{:.2}", tasks_per_sec),
                        "Processing progress"
                    );

                    prev_received = received;
                    prev_time = now;
                }
            }
        }

        // Wait for in-flight applies to finish before reporting final counts.
        let _ = semaphore
            .acquire_many(self.config.max_concurrency as u32)
            .await;

        let final_received = self.total_tasks_received.load(Ordering::Relaxed);
        let final_applied = self.total_tasks_applied.load(Ordering::Relaxed);
        let final_dropped = self.total_tasks_dropped.load(Ordering::Relaxed);
        info!(
            total_tasks_received = final_received,
            total_tasks_applied = final_applied,
            total_tasks_dropped = final_dropped,
            "Orchestrator shutdown complete"
        );
        Ok(())
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
