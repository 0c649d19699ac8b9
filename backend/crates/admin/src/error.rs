//! Admin Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Admin-specific result type alias
pub type AdminResult<T> = Result<T, AdminError>;

/// Admin-specific error variants
#[derive(Debug, Error)]
pub enum AdminError {
    /// Partner not found
    #[error("Partner not found")]
    PartnerNotFound,

    /// API key not found
    #[error("API key not found")]
    ApiKeyNotFound,

    /// Account missing from the directory
    #[error("Account not found")]
    AccountNotFound,

    /// Bearer key missing, malformed, revoked, or unknown
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::PartnerNotFound
            | AdminError::ApiKeyNotFound
            | AdminError::AccountNotFound => StatusCode::NOT_FOUND,
            AdminError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::Database(_) | AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::PartnerNotFound
            | AdminError::ApiKeyNotFound
            | AdminError::AccountNotFound => ErrorKind::NotFound,
            AdminError::InvalidApiKey => ErrorKind::Unauthorized,
            AdminError::Validation(_) => ErrorKind::BadRequest,
            AdminError::Database(_) | AdminError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code, where one is part of the contract
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AdminError::InvalidApiKey => Some("authentication_required"),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self.code() {
            Some(code) => err.with_code(code),
            None => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AdminError::Database(e) => {
                tracing::error!(error = %e, "Admin database error");
            }
            AdminError::Internal(msg) => {
                tracing::error!(message = %msg, "Admin internal error");
            }
            AdminError::InvalidApiKey => {
                tracing::warn!("Rejected partner API key");
            }
            _ => {
                tracing::debug!(error = %self, "Admin request error");
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
