//! Error types for the API server
//!
//! Each layer has its own thiserror enum; everything converges on
//! [`AppError`], which knows how to render itself as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::ApiResponse;

/// Outward message for every credential failure, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Outward message for every unmapped failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == Cache Error Enum ==
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key or value outside the accepted limits
    #[error("Invalid cache request: {0}")]
    InvalidRequest(String),

    /// Cache has no capacity and nothing to evict
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Value could not be encoded for storage
    #[error("Cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Store Error Enum ==
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique field (or the id) already holds this value
    #[error("Duplicate value for '{field}' in collection '{collection}'")]
    Duplicate { collection: String, field: String },

    /// No document with that id
    #[error("Document '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: String },

    /// A stored document does not decode into the requested record type
    #[error("Corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// == Credential Error Enum ==
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Hashing parameters rejected by argon2
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Hash computation failed
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    /// Stored hash is not a parseable PHC string
    #[error("Corrupt password hash: {0}")]
    CorruptHash(String),

    /// Blocking hash task panicked or was cancelled
    #[error("Hashing task failed: {0}")]
    Task(String),
}

// == Application Error Enum ==
/// Taxonomy surfaced by services and rendered by handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more input violations
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    /// Known path, unsupported HTTP method
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field, .. } => {
                AppError::AlreadyExists(format!("A record with this {} already exists", field))
            }
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Corrupt(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(violations) => {
                let message = format!("Validation failed: {}", violations.join("; "));
                ApiResponse::failure_with(message, json!({ "errors": violations }))
            }
            AppError::Internal(detail) => {
                error!("Request failed: {}", detail);
                ApiResponse::failure(INTERNAL_ERROR_MESSAGE)
            }
            other => ApiResponse::failure(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, AppError>;
