// Store Configuration

use crate::application::constants::{
    DEFAULT_IDLE_SWEEP_INTERVAL, DEFAULT_IDLE_THRESHOLD, DEFAULT_QUEUE_CAPACITY,
};
use crate::error::{AppError, Result};
use std::time::Duration;

/// Tunables owned by the queue store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity given to queues created on first write
    pub default_capacity: usize,

    /// Inactivity window after which a queue's contents are purged
    pub idle_threshold: Duration,

    /// Cadence of the idle sweeper
    pub idle_sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_QUEUE_CAPACITY,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            idle_sweep_interval: DEFAULT_IDLE_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Build a validated configuration
    pub fn new(
        default_capacity: usize,
        idle_threshold: Duration,
        idle_sweep_interval: Duration,
    ) -> Result<Self> {
        let config = Self {
            default_capacity,
            idle_threshold,
            idle_sweep_interval,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_capacity == 0 {
            return Err(AppError::Config(
                "default queue capacity must be at least 1".to_string(),
            ));
        }
        if self.idle_sweep_interval.is_zero() {
            return Err(AppError::Config(
                "idle sweep interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn idle_threshold_millis(&self) -> i64 {
        self.idle_threshold.as_millis() as i64
    }
}
