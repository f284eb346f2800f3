use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::probe::StoreStatus;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub influxdb: String,
    pub version: String,
}

/// Root endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
}

/// GET /health
///
/// Reports "degraded" with 503 only when the last InfluxDB probe failed.
/// Before the first probe the store status is "unknown" and the service
/// counts as healthy.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store_health.status();
    let (code, status) = match store {
        StoreStatus::Disconnected => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        StoreStatus::Connected | StoreStatus::Unknown => (StatusCode::OK, "healthy"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        influxdb: store.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (code, Json(response))
}

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        service: "PredictionX API".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
