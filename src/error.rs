//! Error types for the sensor gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::influx::InfluxError;
use crate::model::{ErrorResponse, ValidationError};

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Request rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// InfluxDB write or query failure
    #[error("Database error: {0}")]
    Store(#[from] InfluxError),
}

impl AppError {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::AddrParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(e) => ErrorResponse::new("Validation error", e.to_string()),
            Self::Store(e) => {
                tracing::error!("Store request failed: {}", e);
                ErrorResponse::new("Database error", e.to_string())
            }
            other => {
                tracing::error!("Unexpected error: {}", other);
                ErrorResponse::new("Internal server error", other.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
