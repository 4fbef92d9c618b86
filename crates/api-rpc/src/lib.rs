//! drainq API Layer
//!
//! Two thin front ends over `QueueStore`:
//! - JSON-RPC 2.0 (`queue.submit.v1`, `queue.snapshot.v1`, `admin.stats.v1`)
//! - HTTP (`POST /queue`, `GET /queues`)

pub mod error;
pub mod handler;
pub mod http;
pub mod server;
pub mod types;

pub use http::{HttpServer, HttpServerConfig};
pub use server::{RpcServer, RpcServerConfig};
