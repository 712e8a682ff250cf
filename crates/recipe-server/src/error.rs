//! Server and API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipe_core::InvokeError;
use recipe_telemetry::TelemetryError;
use serde::Serialize;
use thiserror::Error;

/// Error returned to HTTP clients outside the `askBedrock` result shape
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    error_type: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request_error", message)
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", message)
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    message: &'a str,
    #[serde(rename = "type")]
    error_type: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorDetail {
                message: &self.message,
                error_type: self.error_type,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failure to start or run the gateway
#[derive(Debug, Error)]
pub enum ServerError {
    /// The provider transport could not be created
    #[error("failed to create model invoker: {0}")]
    Invoker(#[from] InvokeError),

    /// Metrics could not be registered
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// The listen address is invalid
    #[error("invalid listen address {addr}: {reason}")]
    Address {
        /// Address as configured
        addr: String,
        /// Parse failure
        reason: String,
    },

    /// Binding or serving failed
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
