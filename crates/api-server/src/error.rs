//! Transport-level error taxonomy
//!
//! Every failure a handler can produce ends up as an [`ApiError`], which knows
//! its HTTP status and renders the error envelope. Domain errors from
//! [`shared::Error`] are re-tagged here without changing their message, except
//! for internal failures whose cause is logged and replaced by a generic text.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ErrorResponse;
use crate::services::TokenError;

/// Caller-facing message for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, invalid or expired credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Malformed or missing input
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    /// Unexpected collaborator failure; the message is only ever logged
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            details: None,
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Machine-readable error code used in the envelope
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        use shared::Error;

        match err {
            Error::Validation(msg) => ApiError::validation(msg),
            err @ Error::NotFound { .. } => ApiError::NotFound(err.to_string()),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Authentication(msg) => ApiError::Unauthenticated(msg),
            Error::Authorization(msg) => ApiError::Forbidden(msg),
            err @ (Error::Database(_) | Error::Config(_) | Error::Internal(_)) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors())
            .unwrap_or(serde_json::Value::Null);

        ApiError::Validation {
            message: format!("Validation failed: {}", errors),
            details: Some(details),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => ApiError::Unauthenticated(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Request failed with internal error");
                ErrorResponse::new(self.code(), INTERNAL_ERROR_MESSAGE)
            }
            ApiError::Validation {
                message,
                details: Some(details),
            } => ErrorResponse::with_details(self.code(), message.clone(), details.clone()),
            other => ErrorResponse::new(other.code(), other.to_string()),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
