use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// Input is not readable text (binary upload, invalid UTF-8, malformed export).
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cluster unreachable, authentication rejected, or connect timeout.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Statement rejected, timed out, or returned rows of an unexpected shape.
    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Stable machine-readable kind for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "internal",
            AppError::DecodeError(_) => "decode",
            AppError::InvalidIdentifier(_) => "invalid_identifier",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::ConnectionError(_) => "connection",
            AppError::QueryError(_) => "query",
            AppError::NotFound(_) => "not_found",
        }
    }
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DecodeError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConnectionError(_) => StatusCode::BAD_GATEWAY,
            AppError::QueryError(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // String provided by thiserror → safe JSON message
        let body = Json(json!({
            "is_successful": false,
            "error": self.kind(),
            "error_message": self.to_string()
        }));

        (status, body).into_response()
    }
}
