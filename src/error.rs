//! Error types for the library catalog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes reported in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    Duplicate = 8,
    BadValue = 18,
    NoSuchData = 20,
    AlreadyBorrowed = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not available: {0}")]
    Availability(String),

    #[error("Duplicate loan: {0}")]
    DuplicateLoan(String),

    #[error("Not found: {0}")]
    NotFound(NotFound),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// What a `NotFound` error refers to
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("Book not found")]
    Book,
    #[error("User not found")]
    User,
    #[error("That loan is not active or does not exist.")]
    ActiveLoan,
}

impl AppError {
    /// Whether a store error is a UNIQUE constraint violation
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }

    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone()),
            AppError::Availability(msg) => {
                (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable, msg.clone())
            }
            AppError::DuplicateLoan(msg) => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyBorrowed, msg.clone())
            }
            AppError::NotFound(what) => {
                let code = match what {
                    NotFound::Book => ErrorCode::NoSuchItem,
                    NotFound::User => ErrorCode::NoSuchUser,
                    NotFound::ActiveLoan => ErrorCode::NoSuchData,
                };
                (StatusCode::NOT_FOUND, code, what.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Submitted form values, echoed back so the client can re-fill the form
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub form: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            form: None,
        });

        (status, body).into_response()
    }
}

/// A failed form submission: the error plus the input that produced it
#[derive(Debug)]
pub struct FormFailure {
    pub error: AppError,
    pub form: serde_json::Value,
}

impl FormFailure {
    pub fn new<F: Serialize>(error: AppError, form: &F) -> Self {
        Self {
            error,
            form: serde_json::to_value(form).unwrap_or(serde_json::Value::Null),
        }
    }
}

impl IntoResponse for FormFailure {
    fn into_response(self) -> Response {
        let (status, code, message) = self.error.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            form: Some(self.form),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for form handlers
pub type FormResult<T> = Result<T, FormFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Availability("x".into()), StatusCode::CONFLICT),
            (AppError::DuplicateLoan("x".into()), StatusCode::CONFLICT),
            (AppError::NotFound(NotFound::Book), StatusCode::NOT_FOUND),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn not_found_message_names_the_missing_record() {
        let (_, code, message) = AppError::NotFound(NotFound::ActiveLoan).parts();
        assert_eq!(code, ErrorCode::NoSuchData);
        assert_eq!(message, "That loan is not active or does not exist.");
    }
}
