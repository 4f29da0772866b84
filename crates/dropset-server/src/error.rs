//! HTTP error types for the waitlist server.
//!
//! Maps domain errors from `dropset-core` into HTTP responses. Every error
//! produces a JSON body of the form `{ "error": "<message>" }`, which the
//! landing page shows to the visitor as-is.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dropset_core::error::{InvalidEmail, WaitlistError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The client exceeded its submission rate.
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// No email string in the request body.
    #[error("Email is required")]
    EmailRequired,

    /// The email does not look like an address.
    #[error("Invalid email format")]
    InvalidEmailFormat,

    /// Unexpected failure. The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// Status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::EmailRequired | Self::InvalidEmailFormat => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "waitlist internal error");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<WaitlistError> for AppError {
    fn from(err: WaitlistError) -> Self {
        match err {
            WaitlistError::RateLimited { .. } => Self::RateLimited,
            WaitlistError::InvalidInput(InvalidEmail::Missing) => Self::EmailRequired,
            WaitlistError::InvalidInput(InvalidEmail::Format) => Self::InvalidEmailFormat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let limited: AppError = WaitlistError::RateLimited {
            client_id: "1.2.3.4".to_owned(),
        }
        .into();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

        let missing: AppError = WaitlistError::InvalidInput(InvalidEmail::Missing).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "Email is required");

        let format: AppError = WaitlistError::InvalidInput(InvalidEmail::Format).into();
        assert_eq!(format.to_string(), "Invalid email format");
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = AppError::Internal("body was not JSON: EOF at line 1".to_owned());
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
