//! HTTP front end
//!
//! `POST /queue` takes `{"content": ..., "type": "<queue>"}` and answers
//! `201 Created`; `GET /queues` returns the store snapshot.

use crate::error::ApiError;
use crate::types::{CreatedResponse, QueuePayload};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use drainq_core::application::ShutdownToken;
use drainq_core::domain::{Item, QueueSnapshot};
use drainq_core::{QueueStore, SubmitOutcome};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Create the HTTP router
pub fn router(store: Arc<QueueStore>) -> Router {
    Router::new()
        .route("/queue", post(submit_item))
        .route("/queues", get(list_queues))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// POST /queue
///
/// Decodes the body by hand so any malformed payload, with or without a
/// content type, is a plain 400.
async fn submit_item(
    State(store): State<Arc<QueueStore>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let payload: QueuePayload =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match store.submit(&payload.queue, Item::new(payload.content)).await? {
        SubmitOutcome::Created { .. } => Ok((
            StatusCode::CREATED,
            Json(CreatedResponse {
                queue: payload.queue,
                status: "created".to_string(),
            }),
        )),
        SubmitOutcome::Rejected(err) => Err(err.into()),
    }
}

/// GET /queues
async fn list_queues(State(store): State<Arc<QueueStore>>) -> Json<Vec<QueueSnapshot>> {
    Json(store.snapshot().await)
}

/// HTTP Server Configuration
#[derive(Debug)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    store: Arc<QueueStore>,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, store: Arc<QueueStore>) -> Self {
        Self { config, store }
    }

    /// Bind and serve in a background task until `shutdown` fires
    ///
    /// Returns the bound address and the serving task.
    pub async fn start(
        self,
        mut shutdown: ShutdownToken,
    ) -> Result<(SocketAddr, JoinHandle<()>), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind HTTP server on {}: {}", addr, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let app = router(self.store);
        info!(addr = %local_addr, "HTTP server started");

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.wait().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "HTTP server failed");
            }
            info!("HTTP server stopped");
        });

        Ok((local_addr, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use drainq_core::StoreConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn store(capacity: usize) -> Arc<QueueStore> {
        let config = StoreConfig {
            default_capacity: capacity,
            ..StoreConfig::default()
        };
        Arc::new(QueueStore::with_monotonic_clock(config).unwrap())
    }

    fn post_queue(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/queue")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_queue_created() {
        let store = store(10);
        let response = router(store.clone())
            .oneshot(post_queue(r#"{"Content": "hello", "Type": "mail"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["queue"], "mail");
        assert_eq!(body["status"], "created");
        assert_eq!(store.get("mail").await.unwrap().length, 1);
    }

    #[tokio::test]
    async fn test_post_queue_field_names_ignore_case() {
        let store = store(10);
        let response = router(store.clone())
            .oneshot(post_queue(r#"{"CONTENT": "hello", "TYPE": "mail"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(store.get("mail").await.unwrap().length, 1);
    }

    #[tokio::test]
    async fn test_post_queue_missing_type_is_bad_request() {
        let store = store(10);
        let response = router(store.clone())
            .oneshot(post_queue(r#"{"content": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.queue_count().await, 0);
    }

    #[tokio::test]
    async fn test_post_queue_malformed_is_bad_request() {
        let store = store(10);
        let response = router(store.clone())
            .oneshot(post_queue("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
        assert_eq!(store.queue_count().await, 0);
    }

    #[tokio::test]
    async fn test_post_queue_full_is_conflict() {
        let store = store(1);
        let app = router(store.clone());

        let first = app
            .clone()
            .oneshot(post_queue(r#"{"content": 1, "type": "q"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(post_queue(r#"{"content": 2, "type": "q"}"#))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = json_body(second).await;
        assert_eq!(body["error"], "queue 'q' is full (capacity 1)");
    }

    #[tokio::test]
    async fn test_get_queues_lists_snapshot() {
        let store = store(10);
        store.submit("b", Item::from("x")).await.unwrap();
        store.submit("a", Item::from("x")).await.unwrap();

        let response = router(store)
            .oneshot(Request::builder().uri("/queues").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["name"], "a");
        assert_eq!(body[1]["name"], "b");
        assert_eq!(body[0]["length"], 1);
    }
}
