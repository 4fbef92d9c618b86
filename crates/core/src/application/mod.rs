// Application Layer - Queue store and its background loops

pub mod constants;
pub mod shutdown;
pub mod status;
pub mod store;
pub mod sweeper;

// Re-exports
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use status::StatusReporter;
pub use store::{QueueStore, SubmitOutcome};
pub use sweeper::{CapacitySweeper, IdleSweeper};
