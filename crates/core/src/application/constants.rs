// Store constants (no magic values)
use std::time::Duration;

/// Capacity of a queue created on first write
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// A queue quiet for longer than this has its contents purged (30s)
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(30);

/// Idle sweeper cadence (1s)
pub const DEFAULT_IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Status reporter cadence (1s)
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(1);
