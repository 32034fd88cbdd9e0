//! Unified error handling for the server.
//!
//! # Design Principles
//!
//! - **Declarative**: Each error variant declares its HTTP status code
//! - **Modular**: Error type is self-contained with IntoResponse impl
//! - **SoC**: Error handling separate from business logic

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use simulation::SimError;

/// Application error type with HTTP response mapping.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service unavailable (503).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::UnknownEvent(_) => AppError::BadRequest(err.to_string()),
            SimError::UnknownWarehouse(_) => AppError::NotFound(err.to_string()),
            SimError::SchedulerClosed => AppError::Unavailable(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("warehouse 9".into());
        assert_eq!(err.to_string(), "Not found: warehouse 9");
    }

    #[test]
    fn test_sim_error_mapping() {
        let err: AppError = SimError::UnknownEvent("x".into()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let err: AppError = SimError::SchedulerClosed.into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
