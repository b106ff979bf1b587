//! Error types for the directory cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

// == Directory Error Enum ==
/// Unified error type for the directory cache.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backing row store failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Backend(_) => StatusCode::BAD_GATEWAY,
            DirectoryError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the directory cache.
pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = DirectoryError::NotFound("tool 'x'".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = DirectoryError::Backend(BackendError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = DirectoryError::InvalidRequest("sort".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
