// Capacity Sweeper - drains queues right after they fill

use crate::application::shutdown::ShutdownToken;
use crate::application::store::QueueStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Evacuates full queues so `submit` never has to block or delete
///
/// Parks on the store's full notification instead of spinning; a queue is
/// drained one task wake-up after its filling append.
pub struct CapacitySweeper {
    store: Arc<QueueStore>,
}

impl CapacitySweeper {
    pub fn new(store: Arc<QueueStore>) -> Self {
        Self { store }
    }

    /// Run the sweep loop until shutdown
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!("Capacity sweeper started");
        loop {
            if shutdown.is_shutdown() {
                break;
            }

            tokio::select! {
                _ = self.store.wait_for_full() => {},
                _ = shutdown.wait() => {
                    info!("Capacity sweeper interrupted while waiting");
                    break;
                }
            }

            let purged = self.sweep_once().await;
            if purged > 0 {
                debug!(purged, "Capacity sweep completed");
            }
        }
        info!("Capacity sweeper stopped");
    }

    /// Single pass over the registry
    pub async fn sweep_once(&self) -> usize {
        self.store.purge_full().await
    }
}
