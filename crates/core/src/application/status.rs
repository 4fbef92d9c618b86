// Status Reporter - periodic one-line summary of every queue

use crate::application::shutdown::ShutdownToken;
use crate::application::store::QueueStore;
use crate::domain::QueueSnapshot;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Logs a snapshot of the store every `interval`. Display only.
pub struct StatusReporter {
    store: Arc<QueueStore>,
    interval: Duration,
}

impl StatusReporter {
    pub fn new(store: Arc<QueueStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub async fn run(self, mut shutdown: ShutdownToken) {
        let mut tick = interval_at(Instant::now() + self.interval, self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {},
                _ = shutdown.wait() => break,
            }

            let snapshot = self.store.snapshot().await;
            info!(total_queues = snapshot.len(), "{}", render(&snapshot));
        }
    }
}

/// Render `Queue <name>: <n> items cleared <k> times | ... Total Queues: <count>`
pub fn render(snapshot: &[QueueSnapshot]) -> String {
    let mut line = String::new();
    for queue in snapshot {
        // Writing into a String cannot fail
        let _ = write!(
            line,
            "Queue {}: {} items cleared {} times | ",
            queue.name, queue.length, queue.purge_count
        );
    }
    let _ = write!(line, "Total Queues: {}", snapshot.len());
    line
}
