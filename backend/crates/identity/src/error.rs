//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Client-branchable failures carry a
//! stable machine-readable code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::PhoneFormatError;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Phone could not be normalized to E.164
    #[error("{0}")]
    InvalidPhone(#[from] PhoneFormatError),

    /// NIDA number failed validation
    #[error("NIDA number must be exactly 20 digits")]
    InvalidNidaNumber,

    /// Password rejected by policy
    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Phone already registered
    #[error("Phone number is already registered")]
    DuplicatePhone,

    /// NIDA number already registered to another account
    #[error("NIDA number is already registered")]
    DuplicateNationalId,

    /// Role key does not exist
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Wrong phone/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session on a protected route
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Session present but lacks a required role
    #[error("Forbidden")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::InvalidPhone(_)
            | IdentityError::InvalidNidaNumber
            | IdentityError::PasswordPolicy(_)
            | IdentityError::UnknownRole(_) => StatusCode::BAD_REQUEST,
            IdentityError::DuplicatePhone | IdentityError::DuplicateNationalId => {
                StatusCode::CONFLICT
            }
            IdentityError::AccountNotFound => StatusCode::NOT_FOUND,
            IdentityError::InvalidCredentials | IdentityError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::Forbidden => StatusCode::FORBIDDEN,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidPhone(_)
            | IdentityError::InvalidNidaNumber
            | IdentityError::PasswordPolicy(_)
            | IdentityError::UnknownRole(_) => ErrorKind::BadRequest,
            IdentityError::DuplicatePhone | IdentityError::DuplicateNationalId => {
                ErrorKind::Conflict
            }
            IdentityError::AccountNotFound => ErrorKind::NotFound,
            IdentityError::InvalidCredentials | IdentityError::AuthenticationRequired => {
                ErrorKind::Unauthorized
            }
            IdentityError::Forbidden => ErrorKind::Forbidden,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code for clients, where one is part of the
    /// contract.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            IdentityError::InvalidPhone(_) => Some("invalid_phone_format"),
            IdentityError::DuplicatePhone => Some("duplicate_phone"),
            IdentityError::DuplicateNationalId => Some("duplicate_national_id"),
            IdentityError::UnknownRole(_) => Some("unknown_role"),
            IdentityError::InvalidCredentials => Some("invalid_credentials"),
            IdentityError::AuthenticationRequired => Some("authentication_required"),
            IdentityError::Forbidden => Some("forbidden"),
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
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            IdentityError::AuthenticationRequired => {
                tracing::debug!("Unauthenticated request to protected route");
            }
            IdentityError::Forbidden => {
                tracing::warn!("Role check failed on protected route");
            }
            _ => {
                tracing::debug!(error = %self, "Identity request error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
