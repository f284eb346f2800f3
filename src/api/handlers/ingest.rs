// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::metrics::outcome;
use crate::model::{IngestResponse, SensorReading, ValidationError};

/// POST /api/ingest
///
/// Validates a sensor reading and writes it to InfluxDB.
/// Answers 201 with the write timestamp, 400 on invalid input
/// and 500 when the store rejects the write.
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SensorReading>, JsonRejection>,
) -> Result<(StatusCode, Json<IngestResponse>)> {
    let reading = payload
        .map_err(|e| ValidationError::Body(e.body_text()))
        .and_then(|Json(reading)| reading.validate())
        .map_err(|e| {
            tracing::debug!("Rejected ingest request: {}", e);
            state.metrics.record_ingest(outcome::REJECTED);
            AppError::from(e)
        })?;

    let timestamp = state.service.write_reading(&reading).await.map_err(|e| {
        state.metrics.record_ingest(outcome::ERROR);
        AppError::from(e)
    })?;

    state.metrics.record_ingest(outcome::SUCCESS);
    Ok((
        StatusCode::CREATED,
        Json(IngestResponse::new(reading.sensor_id(), timestamp)),
    ))
}
