//! Error types for the cache crate
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for every cache backend.
///
/// A miss is never an error: backends report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The operation context was cancelled before the call
    #[error("context cancelled in {op} operation")]
    Cancelled { op: &'static str },

    /// The operation context's deadline had already passed
    #[error("context deadline exceeded in {op} operation")]
    DeadlineExceeded { op: &'static str },

    /// A bounded store was configured with zero capacity
    #[error("cache capacity must be greater than zero")]
    InvalidCapacity,

    /// Failure reported by an underlying backend, passed through unchanged
    #[error(transparent)]
    Backend(#[from] anyhow::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns true for the errors produced by a cancelled or expired context.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            CacheError::Cancelled { .. } | CacheError::DeadlineExceeded { .. }
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Cancelled { .. } | CacheError::DeadlineExceeded { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidCapacity | CacheError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
