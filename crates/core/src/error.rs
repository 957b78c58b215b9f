//! Structured error handling for the HTTP API.
//!
//! Every failure is one of a closed set of kinds, each mapped to a fixed
//! status code and rendered as `{"message": ...}`.
//! Internal details are logged but never exposed to clients.

use std::fmt::Display;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message sent to clients for every internal failure.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application error type with automatic HTTP response conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a not found error for an entity.
    ///
    /// The identifier is deliberately left out so the message is the same
    /// for every missing (or foreign) record of that kind.
    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }

    /// Create a conflict error for duplicate data.
    #[must_use]
    pub fn conflict(entity: &str, field: &str) -> Self {
        Self::Conflict(format!("{entity} with this {field} already exists"))
    }

    /// HTTP status code for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Unauthenticated(msg)
            | Self::InvalidArgument(msg)
            | Self::Conflict(msg) => msg,
            Self::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(msg) = &self {
            error!(error = %msg, "Internal error");
        }

        let status = self.status_code();
        let mut response = (
            status,
            Json(ErrorBody {
                message: self.public_message(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                http::header::WWW_AUTHENTICATE,
                http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

/// Extension trait for converting errors to `AppError::Internal` with logging.
pub trait ResultExt<T> {
    /// Convert any displayable error to an internal error.
    ///
    /// # Errors
    /// Returns `AppError::Internal` with the provided context.
    fn internal(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn internal(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            error!(error = %e, "{msg}");
            AppError::Internal(format!("{msg}: {e}"))
        })
    }
}

/// Extension trait for Option types.
pub trait OptionExt<T> {
    /// Convert `None` to a not found error for the given entity.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the option is `None`.
    fn ok_or_not_found(self, entity: &str) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> Result<T, AppError> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helper_formats_correctly() {
        let err = AppError::not_found("Contact");
        assert_eq!(err.public_message(), "Contact not found");
    }

    #[test]
    fn conflict_helper_formats_correctly() {
        let err = AppError::conflict("User", "email");
        assert!(err.to_string().contains("User"));
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidArgument("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::Internal("connection refused on 10.0.0.3".into());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn unauthorized_response_carries_challenge() {
        let response = AppError::Unauthenticated("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(http::header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn option_ext_maps_none() {
        let missing: Option<u8> = None;
        assert!(matches!(
            missing.ok_or_not_found("Contact"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(Some(3).ok_or_not_found("Contact").unwrap(), 3);
    }
}
