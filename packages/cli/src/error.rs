use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quillpad_storage::StorageError;
use quillpad_tags::{FieldErrors, TagQueryError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation; carries the store's reason
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(StorageError),
}

/// Error body: `{status, message}` plus field errors or an opaque code
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-friendly error message (sanitized for external consumption)
    fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Database(_) => "DB Error".to_string(),
        }
    }

    pub fn tag_not_found(tag_id: &str) -> Self {
        Self::NotFound(format!("Tag '{}' not found", tag_id))
    }
}

/// Unique violations become conflicts; everything else is an opaque DB error
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation(reason) => AppError::Conflict(reason),
            other => AppError::Database(other),
        }
    }
}

impl From<TagQueryError> for AppError {
    fn from(err: TagQueryError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        let code = match &self {
            AppError::Database(err) => {
                let code = Uuid::new_v4().simple().to_string();
                error!(code = %code, error = %err, "An unknown db error occurred");
                Some(code)
            }
            _ => {
                info!(status = status.as_u16(), error = %self, "API error response");
                None
            }
        };

        let errors = match self {
            AppError::Validation(err) => Some(err.fields),
            _ => None,
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message,
            errors,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
