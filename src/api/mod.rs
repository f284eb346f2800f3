//! HTTP API module for the sensor gateway
//!
//! # Endpoints
//! - `POST /api/ingest` — store a sensor reading
//! - `GET /api/latest/{sensor_id}` — most recent reading of a sensor
//! - `GET /api/history/{sensor_id}?minutes=N` — readings of the last N minutes
//! - `GET /health` — health check with InfluxDB status
//! - `GET /metrics` — Prometheus metrics
//! - `GET /` — service banner

pub mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/ingest", post(handlers::ingest_reading))
        .route("/api/latest/{sensor_id}", get(handlers::latest_reading))
        .route("/api/history/{sensor_id}", get(handlers::sensor_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
