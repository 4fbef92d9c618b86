// Domain Layer - Queue entities and their invariants

pub mod error;
pub mod item;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use item::Item;
pub use queue::{BoundedQueue, QueueName, QueueSnapshot};
