//! API Error Types
//!
//! Maps application errors to JSON-RPC error objects and HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use drainq_core::domain::DomainError;
use drainq_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const QUEUE_FULL: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Domain(e) => domain_to_rpc_error(e),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Convert DomainError to JSON-RPC ErrorObject
pub fn domain_to_rpc_error(err: DomainError) -> ErrorObjectOwned {
    match err {
        DomainError::QueueFull { .. } => {
            ErrorObjectOwned::owned(code::QUEUE_FULL, err.to_string(), None::<()>)
        }
        DomainError::InvalidCapacity(_) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, err.to_string(), None::<()>)
        }
    }
}

/// HTTP error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// Target queue at capacity
    #[error("{0}")]
    QueueFull(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::QueueFull(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(e) => e.into(),
            other @ AppError::Config(_) => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::QueueFull { .. } => ApiError::QueueFull(err.to_string()),
            DomainError::InvalidCapacity(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
