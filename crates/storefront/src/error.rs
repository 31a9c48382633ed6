//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pricing::PricingError;

/// Application-level error type for the pricing service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Pricing failed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Pricing(PricingError::InvalidItems(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Pricing(
                PricingError::Http(_) | PricingError::Rejected { .. } | PricingError::Parse(_),
            ) => StatusCode::BAD_GATEWAY,
            Self::Pricing(PricingError::Url(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Pricing(PricingError::InvalidItems(msg)) => format!("Invalid items: {msg}"),
            Self::BadRequest(msg) => format!("Bad request: {msg}"),
            _ if status == StatusCode::BAD_GATEWAY => "External service error".to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::Pricing(PricingError::InvalidItems("zero quantity".to_string()));
        assert_eq!(err.to_string(), "Pricing error: invalid items: zero quantity");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Pricing(PricingError::InvalidItems(
                "test".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Pricing(PricingError::Rejected {
                status: 503,
                message: "down".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Pricing(PricingError::Url(
                url::ParseError::EmptyHost
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
