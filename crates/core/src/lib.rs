// drainq Core - Queue store, sweepers & ports
// NO transport dependencies: servers and the daemon live in outer crates

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{QueueStore, SubmitOutcome};
pub use config::StoreConfig;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
