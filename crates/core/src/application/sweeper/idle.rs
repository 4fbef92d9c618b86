// Idle Sweeper - expires queues that stopped receiving writes

use crate::application::shutdown::ShutdownToken;
use crate::application::store::QueueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Purges queues idle past the store's idle threshold, once per interval
///
/// Staleness of idle data is bounded by threshold + interval.
pub struct IdleSweeper {
    store: Arc<QueueStore>,
    interval: Duration,
}

impl IdleSweeper {
    /// Sweeper ticking at the store's configured idle sweep interval
    pub fn new(store: Arc<QueueStore>) -> Self {
        let interval = store.config().idle_sweep_interval;
        Self { store, interval }
    }

    /// Run the sweep loop until shutdown
    ///
    /// Sleeps one interval before the first pass.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            threshold_ms = self.store.config().idle_threshold.as_millis() as u64,
            "Idle sweeper started"
        );

        let mut tick = interval_at(Instant::now() + self.interval, self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {},
                _ = shutdown.wait() => {
                    info!("Idle sweeper interrupted");
                    break;
                }
            }

            let purged = self.sweep_once().await;
            if purged > 0 {
                debug!(purged, "Idle sweep completed");
            }
        }
        info!("Idle sweeper stopped");
    }

    pub async fn sweep_once(&self) -> usize {
        self.store.purge_idle().await
    }
}
