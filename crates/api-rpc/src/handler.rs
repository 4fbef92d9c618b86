//! RPC Method Handlers
//!
//! Translates JSON-RPC calls into `QueueStore` operations.

use crate::error::{domain_to_rpc_error, to_rpc_error};
use crate::types::{SnapshotResponse, StatsResponse, SubmitRequest, SubmitResponse};
use drainq_core::domain::Item;
use drainq_core::{QueueStore, SubmitOutcome};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// RPC Handler with injected store
pub struct RpcHandler {
    store: Arc<QueueStore>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(store: Arc<QueueStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }

    /// queue.submit.v1
    pub async fn submit(&self, params: SubmitRequest) -> Result<SubmitResponse, ErrorObjectOwned> {
        let outcome = self
            .store
            .submit(&params.queue, Item::new(params.content))
            .await
            .map_err(to_rpc_error)?;

        match outcome {
            SubmitOutcome::Created { length } => Ok(SubmitResponse {
                queue: params.queue,
                accepted: true,
                length,
            }),
            SubmitOutcome::Rejected(err) => {
                debug!(queue = %params.queue, "Rejected submit on full queue");
                Err(domain_to_rpc_error(err))
            }
        }
    }

    /// queue.snapshot.v1
    pub async fn snapshot(&self) -> Result<SnapshotResponse, ErrorObjectOwned> {
        let queues = self.store.snapshot().await;
        Ok(SnapshotResponse {
            total_queues: queues.len(),
            queues,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let queues = self.store.snapshot().await;

        Ok(StatsResponse {
            total_queues: queues.len(),
            total_items: queues.iter().map(|q| q.length).sum(),
            total_purges: queues.iter().map(|q| q.purge_count).sum(),
            default_capacity: self.store.config().default_capacity,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use drainq_core::StoreConfig;
    use serde_json::json;

    fn handler(capacity: usize) -> RpcHandler {
        let config = StoreConfig {
            default_capacity: capacity,
            ..StoreConfig::default()
        };
        RpcHandler::new(Arc::new(QueueStore::with_monotonic_clock(config).unwrap()))
    }

    fn request(queue: &str) -> SubmitRequest {
        SubmitRequest {
            queue: queue.to_string(),
            content: json!({"msg": "hi"}),
        }
    }

    #[tokio::test]
    async fn test_submit_reports_length() {
        let handler = handler(10);
        handler.submit(request("a")).await.unwrap();
        let response = handler.submit(request("a")).await.unwrap();

        assert!(response.accepted);
        assert_eq!(response.length, 2);
        assert_eq!(response.queue, "a");
    }

    #[tokio::test]
    async fn test_submit_full_returns_queue_full_code() {
        let handler = handler(1);
        handler.submit(request("a")).await.unwrap();

        let err = handler.submit(request("a")).await.unwrap_err();
        assert_eq!(err.code(), code::QUEUE_FULL);
    }

    #[tokio::test]
    async fn test_stats_totals() {
        let handler = handler(2);
        handler.submit(request("a")).await.unwrap();
        handler.submit(request("b")).await.unwrap();
        handler.submit(request("b")).await.unwrap();
        handler.store.purge_full().await;

        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.total_queues, 2);
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.total_purges, 1);
        assert_eq!(stats.default_capacity, 2);

        let snapshot = handler.snapshot().await.unwrap();
        assert_eq!(snapshot.total_queues, 2);
        assert_eq!(snapshot.queues[0].name, "a");
    }
}
