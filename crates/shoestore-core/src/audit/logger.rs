use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use flume::{bounded, Receiver, Sender};
use shoestore_shared::config::AuditSettings;
use shoestore_shared::Clock;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::types::AuditEvent;
use crate::domain::NewAuditEntry;
use crate::repositories::AuditRepository;

/// Logger configuration
#[derive(Debug, Clone)]
pub struct AuditLoggerConfig {
    /// Queue capacity. Entries beyond it are dropped.
    pub queue_capacity: usize,

    /// Batch size for database inserts
    pub batch_size: usize,

    /// Max wait time before flushing a partial batch (milliseconds)
    pub batch_timeout_ms: u64,

    /// Number of worker tasks draining the queue
    pub worker_count: usize,
}

impl Default for AuditLoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
            batch_size: 100,
            batch_timeout_ms: 1000,
            worker_count: 2,
        }
    }
}

impl From<&AuditSettings> for AuditLoggerConfig {
    fn from(settings: &AuditSettings) -> Self {
        Self {
            queue_capacity: settings.queue_capacity.max(1),
            batch_size: settings.batch_size.max(1),
            batch_timeout_ms: settings.batch_timeout_ms,
            worker_count: settings.worker_count.max(1),
        }
    }
}

/// Non-blocking audit recorder backed by a bounded queue.
///
/// Entries may be lost when the queue is full, when a batch insert fails,
/// or when the process dies before [`AuditLogger::shutdown`] runs.
#[derive(Clone)]
pub struct AuditLogger {
    sender: Sender<NewAuditEntry>,
    clock: Arc<dyn Clock>,
    stop: Arc<watch::Sender<bool>>,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl AuditLogger {
    /// Spawns the workers. Must be called from within a Tokio runtime.
    pub fn new(repo: Arc<dyn AuditRepository>, clock: Arc<dyn Clock>, config: AuditLoggerConfig) -> Self {
        let (sender, receiver) = bounded(config.queue_capacity);
        let (stop, _) = watch::channel(false);

        info!(
            "Initializing AuditLogger: queue={}, batch={}, timeout={}ms, workers={}",
            config.queue_capacity, config.batch_size, config.batch_timeout_ms, config.worker_count
        );

        let workers = (0..config.worker_count)
            .map(|worker_id| {
                let repo = repo.clone();
                let receiver = receiver.clone();
                let config = config.clone();
                let stop = stop.subscribe();
                tokio::spawn(async move {
                    Self::worker_loop(worker_id, repo, receiver, config, stop).await;
                })
            })
            .collect();

        Self {
            sender,
            clock,
            stop: Arc::new(stop),
            workers: Arc::new(Mutex::new(workers)),
        }
    }

    /// Records an event stamped with the current time. Anonymous actors are ignored.
    pub fn record(&self, actor: Option<i32>, event: AuditEvent) {
        self.record_at(actor, event, self.clock.now());
    }

    /// Records an event with an explicit timestamp. Anonymous actors are ignored.
    pub fn record_at(&self, actor: Option<i32>, event: AuditEvent, at: DateTime<Utc>) {
        let Some(user_id) = actor else {
            return;
        };

        let entry = NewAuditEntry {
            user_id,
            action: event.action,
            entity: event.entity,
            entity_id: event.entity_id,
            details: event.details,
            created_at: at,
        };

        if let Err(e) = self.sender.try_send(entry) {
            warn!("Dropping audit entry (queue full or closed): {}", e);
        }
    }

    pub fn queue_len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_queue_full(&self) -> bool {
        self.sender.is_full()
    }

    /// Stops the workers after they drain the queue. Returns false if the
    /// drain did not finish within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!("Audit logger shutting down ({} entries pending)", self.queue_len());
        self.stop.send_replace(true);

        let handles: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
        let joined = tokio::time::timeout(timeout, async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    error!("Audit worker terminated abnormally: {}", e);
                }
            }
        })
        .await;

        if joined.is_err() {
            warn!("Audit drain timed out, {} entries lost", self.queue_len());
            return false;
        }
        true
    }

    /// Worker loop: collects batches until full or timed out, then flushes.
    async fn worker_loop(
        worker_id: usize,
        repo: Arc<dyn AuditRepository>,
        receiver: Receiver<NewAuditEntry>,
        config: AuditLoggerConfig,
        mut stop: watch::Receiver<bool>,
    ) {
        debug!("Audit worker {} started", worker_id);

        let mut batch: Vec<NewAuditEntry> = Vec::with_capacity(config.batch_size);
        let batch_timeout = Duration::from_millis(config.batch_timeout_ms);

        loop {
            let deadline = tokio::time::Instant::now() + batch_timeout;
            let mut stopping = *stop.borrow();

            while !stopping && batch.len() < config.batch_size {
                tokio::select! {
                    received = tokio::time::timeout_at(deadline, receiver.recv_async()) => {
                        match received {
                            Ok(Ok(entry)) => batch.push(entry),
                            // Channel closed
                            Ok(Err(_)) => stopping = true,
                            // Timeout, flush what we have
                            Err(_) => break,
                        }
                    }
                    _ = stop.changed() => stopping = true,
                }
            }

            if stopping {
                while let Ok(entry) = receiver.try_recv() {
                    batch.push(entry);
                    if batch.len() >= config.batch_size {
                        Self::flush_batch(repo.as_ref(), &batch, worker_id).await;
                        batch.clear();
                    }
                }
                if !batch.is_empty() {
                    Self::flush_batch(repo.as_ref(), &batch, worker_id).await;
                }
                debug!("Audit worker {} stopped", worker_id);
                return;
            }

            if !batch.is_empty() {
                Self::flush_batch(repo.as_ref(), &batch, worker_id).await;
                batch.clear();
            }
        }
    }

    async fn flush_batch(repo: &dyn AuditRepository, batch: &[NewAuditEntry], worker_id: usize) {
        let start = std::time::Instant::now();

        match repo.insert_batch(batch).await {
            Ok(inserted) => {
                debug!(
                    "Audit worker {} inserted {} entries in {:?}",
                    worker_id,
                    inserted,
                    start.elapsed()
                );
            }
            Err(e) => {
                error!("Audit worker {} failed to insert {} entries: {}", worker_id, batch.len(), e);
            }
        }
    }
}
