//! Error types for the catalog API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Repository Error ==
/// Failure of the persistence backend itself (I/O, connectivity).
///
/// Lookup misses are not errors; repository methods return `Ok(None)` for those.
#[derive(Error, Debug)]
pub enum RepoError {
    /// Storage backend failure
    #[error("storage backend failure: {0}")]
    Backend(String),
}

// == API Error Enum ==
/// Unified error taxonomy for the catalog API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid request fields
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity id or slug does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Persistence layer failure
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog API.
pub type Result<T> = std::result::Result<T, ApiError>;
