//! Error types for the lending service

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Index guarding the single-active-loan invariant
pub const ACTIVE_BORROW_INDEX: &str = "borrowings_one_active_per_book";

/// Machine-readable error codes carried in every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NotFound = 3,
    BookNotFound = 4,
    MemberNotFound = 5,
    AlreadyExists = 6,
    AlreadyBorrowed = 7,
    AlreadyReturned = 8,
    CannotDeleteBorrowed = 9,
    CannotDeleteMemberWithBorrowings = 10,
    BadValue = 11,
    Unavailable = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Book with id {0} not found")]
    BookNotFound(i64),

    #[error("Member with id {0} not found")]
    MemberNotFound(i64),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(i64),

    #[error("Borrowing {0} is already returned")]
    AlreadyReturned(i64),

    #[error("Book {0} is currently borrowed and cannot be deleted")]
    CannotDeleteBorrowed(i64),

    #[error("Member {0} has active borrowings and cannot be deleted")]
    CannotDeleteMemberWithBorrowings(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Taxonomy name of this error, independent of any transport
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BookNotFound(_) => "BOOK_NOT_FOUND",
            AppError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::AlreadyBorrowed(_) => "ALREADY_BORROWED",
            AppError::AlreadyReturned(_) => "ALREADY_RETURNED",
            AppError::CannotDeleteBorrowed(_) => "CANNOT_DELETE_BORROWED",
            AppError::CannotDeleteMemberWithBorrowings(_) => {
                "CANNOT_DELETE_MEMBER_WITH_BORROWINGS"
            }
            AppError::Validation(_) => "VALIDATION",
            AppError::Unavailable(_) => "TRANSIENT",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Whether a caller may retry the same request after a backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }

    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::BookNotFound),
            AppError::MemberNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::MemberNotFound),
            AppError::AlreadyExists(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyExists),
            // Failed preconditions
            AppError::AlreadyBorrowed(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyBorrowed),
            AppError::AlreadyReturned(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyReturned),
            AppError::CannotDeleteBorrowed(_) => {
                (StatusCode::CONFLICT, ErrorCode::CannotDeleteBorrowed)
            }
            AppError::CannotDeleteMemberWithBorrowings(_) => (
                StatusCode::CONFLICT,
                ErrorCode::CannotDeleteMemberWithBorrowings,
            ),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::Unavailable),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                AppError::Unavailable("timed out waiting for a database connection".to_string())
            }
            sqlx::Error::PoolClosed => {
                AppError::Unavailable("database pool is closed".to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("invalid path parameter: {}", rejection.body_text()))
    }
}

/// Name of the unique constraint a store error violated, if it is one
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: self.kind().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
