// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("queue '{queue}' is full (capacity {capacity})")]
    QueueFull { queue: String, capacity: usize },

    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),
}

pub type Result<T> = std::result::Result<T, DomainError>;
