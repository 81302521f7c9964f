//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{IngestError, PasswordChangeError};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Core rejections (credential and image ingestion)
    #[error(transparent)]
    PasswordChange(#[from] PasswordChangeError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Caller-side protocol violation or corrupted stored data
    #[error("Consistency violation: {0}")]
    Consistency(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::PasswordChange(e) => e.code(),
            AppError::Ingest(e) => e.code(),
            AppError::Consistency(_) => "CONSISTENCY_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::PasswordChange(e) if e.is_authentication_failure() => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::PasswordChange(_)
            | AppError::Ingest(_) => StatusCode::BAD_REQUEST,
            AppError::Consistency(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => format!("{} already exists", msg),

            // Hide details for internal/security errors
            AppError::Consistency(msg) => {
                tracing::error!("Consistency violation: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        AppError::Consistency(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_rejections_have_distinct_statuses() {
        let auth: AppError = PasswordChangeError::IncorrectCurrentPassword.into();
        let mismatch: AppError = PasswordChangeError::ConfirmationMismatch.into();
        let unchanged: AppError = PasswordChangeError::UnchangedPassword.into();

        assert_eq!(auth.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unchanged.status(), StatusCode::BAD_REQUEST);
        assert_ne!(mismatch.code(), unchanged.code());
    }

    #[test]
    fn test_ingest_rejections_are_validation_errors() {
        let capacity: AppError = IngestError::CapacityExceeded { projected: 6, max: 5 }.into();
        let file_type: AppError = IngestError::UnsupportedFileType {
            filename: "virus.exe".to_string(),
        }
        .into();

        assert_eq!(capacity.status(), StatusCode::BAD_REQUEST);
        assert_eq!(file_type.status(), StatusCode::BAD_REQUEST);
        assert_eq!(capacity.code(), "IMAGE_LIMIT_EXCEEDED");
        assert!(file_type.user_message().contains("virus.exe"));
    }

    #[test]
    fn test_consistency_error_hides_details() {
        let err = AppError::consistency("credential row missing for user");

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_option_ext_not_found() {
        let value: Option<u8> = None;
        assert!(matches!(value.ok_or_not_found(), Err(AppError::NotFound)));
    }
}
