// Queue Store - registry of named bounded queues
//
// One registry-wide lock guards every queue. Writers, both sweepers and the
// status reporter all serialize on it; throughput across many distinct queue
// names is bounded by this lock.

use crate::config::StoreConfig;
use crate::domain::{BoundedQueue, DomainError, Item, QueueName, QueueSnapshot};
use crate::error::Result;
use crate::port::{MonotonicTimeProvider, TimeProvider};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

type Registry = HashMap<QueueName, BoundedQueue>;

/// Result of a submit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Item accepted; `length` is the queue length right after the append
    Created { length: usize },
    /// Queue at capacity, nothing written
    Rejected(DomainError),
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }

    /// Collapse into a `Result` for callers that treat rejection as an error
    pub fn into_result(self) -> std::result::Result<usize, DomainError> {
        match self {
            SubmitOutcome::Created { length } => Ok(length),
            SubmitOutcome::Rejected(err) => Err(err),
        }
    }
}

/// Shared store of named queues
///
/// Constructed once at startup and handed to every collaborator as
/// `Arc<QueueStore>`. Queue records are created lazily and never removed.
pub struct QueueStore {
    queues: Mutex<Registry>,
    config: StoreConfig,
    time_provider: Arc<dyn TimeProvider>,
    /// Woken by every append that raises a full signal
    full_notify: Notify,
}

impl QueueStore {
    /// Create an empty store
    ///
    /// Fails with `AppError::Config` if `config` is invalid.
    pub fn new(config: StoreConfig, time_provider: Arc<dyn TimeProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            queues: Mutex::new(HashMap::new()),
            config,
            time_provider,
            full_notify: Notify::new(),
        })
    }

    /// Create a store driven by a monotonic clock
    pub fn with_monotonic_clock(config: StoreConfig) -> Result<Self> {
        Self::new(config, Arc::new(MonotonicTimeProvider::new()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Push `item` into queue `name`, creating the queue on first write
    ///
    /// Never waits on a full queue: returns `SubmitOutcome::Rejected` instead.
    pub async fn submit(&self, name: &str, item: Item) -> Result<SubmitOutcome> {
        let mut queues = self.queues.lock().await;
        let now = self.time_provider.now_millis();
        let queue = find_or_create(&mut queues, name, self.config.default_capacity)?;

        match queue.append(item, now) {
            Ok(signal_raised) => {
                let length = queue.len();
                drop(queues);

                if signal_raised {
                    debug!(queue = %name, length, "Queue reached capacity");
                    self.full_notify.notify_one();
                }
                Ok(SubmitOutcome::Created { length })
            }
            Err(err @ DomainError::QueueFull { .. }) => Ok(SubmitOutcome::Rejected(err)),
            Err(err) => Err(err.into()),
        }
    }

    /// Drain every queue whose full signal is raised (one capacity sweep)
    ///
    /// Returns the number of queues purged.
    pub async fn purge_full(&self) -> usize {
        let mut queues = self.queues.lock().await;
        let mut purged = 0;

        for queue in queues.values_mut() {
            if queue.take_full_signal() {
                queue.drain();
                purged += 1;
                debug!(
                    queue = %queue.name(),
                    purge_count = queue.purge_count(),
                    "Purged full queue"
                );
            }
        }
        purged
    }

    /// Drain every queue idle for longer than the idle threshold and reset
    /// its last write time (one idle sweep)
    ///
    /// Returns the number of queues purged.
    pub async fn purge_idle(&self) -> usize {
        let threshold = self.config.idle_threshold_millis();
        let mut queues = self.queues.lock().await;
        let now = self.time_provider.now_millis();
        let mut purged = 0;

        for queue in queues.values_mut() {
            if queue.is_idle(now, threshold) {
                queue.drain();
                queue.reset_last_write();
                purged += 1;
                debug!(
                    queue = %queue.name(),
                    purge_count = queue.purge_count(),
                    "Purged idle queue"
                );
            }
        }
        purged
    }

    /// Resolves once some append has raised a full signal
    ///
    /// A signal raised while nobody waits is remembered, so no fill event
    /// is lost between sweeps.
    pub async fn wait_for_full(&self) {
        self.full_notify.notified().await;
    }

    /// Name, length and purge count of every queue, sorted by name
    pub async fn snapshot(&self) -> Vec<QueueSnapshot> {
        let queues = self.queues.lock().await;
        let mut snapshot: Vec<QueueSnapshot> = queues.values().map(|q| q.snapshot()).collect();
        snapshot.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
    }

    pub async fn get(&self, name: &str) -> Option<QueueSnapshot> {
        self.queues.lock().await.get(name).map(|q| q.snapshot())
    }

    /// Run `f` against queue `name` under the registry lock
    pub async fn inspect<R>(&self, name: &str, f: impl FnOnce(&BoundedQueue) -> R) -> Option<R> {
        self.queues.lock().await.get(name).map(f)
    }

    pub async fn queue_count(&self) -> usize {
        self.queues.lock().await.len()
    }
}

/// Look up `name` in the locked registry, inserting a fresh queue of
/// `capacity` when absent
fn find_or_create<'a>(
    queues: &'a mut Registry,
    name: &str,
    capacity: usize,
) -> std::result::Result<&'a mut BoundedQueue, DomainError> {
    match queues.entry(name.to_string()) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let queue = BoundedQueue::new(name, capacity)?;
            debug!(queue = %name, capacity, "Created queue");
            Ok(entry.insert(queue))
        }
    }
}
