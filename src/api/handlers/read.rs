// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::metrics::{outcome, query};
use crate::model::{
    HistoryParams, HistoryPoint, HistoryWindow, LatestReadingResponse, ValidationError,
    validate_sensor_id,
};

/// GET /api/latest/{sensor_id}
///
/// A sensor without data in the lookback range is answered with
/// `found: false`, not 404.
pub async fn latest_reading(
    State(state): State<Arc<AppState>>,
    Path(sensor_id): Path<String>,
) -> Result<Json<LatestReadingResponse>> {
    let sensor_id = validate_sensor_id(&sensor_id).map_err(|e| {
        state.metrics.record_query(query::LATEST, outcome::REJECTED);
        AppError::from(e)
    })?;

    let latest = state.service.latest_reading(&sensor_id).await.map_err(|e| {
        state.metrics.record_query(query::LATEST, outcome::ERROR);
        AppError::from(e)
    })?;

    state.metrics.record_query(query::LATEST, outcome::SUCCESS);
    Ok(Json(match latest {
        Some(reading) => reading.into(),
        None => {
            tracing::debug!("No recent data for sensor {}", sensor_id);
            LatestReadingResponse::not_found(sensor_id)
        }
    }))
}

/// GET /api/history/{sensor_id}?minutes=N
///
/// `minutes` defaults to 60 and is bounded by `Config::history_max_minutes`.
pub async fn sensor_history(
    State(state): State<Arc<AppState>>,
    Path(sensor_id): Path<String>,
    params: std::result::Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<HistoryPoint>>> {
    let request = params
        .map_err(|e| ValidationError::Query(e.body_text()))
        .and_then(|Query(params)| {
            let window =
                HistoryWindow::from_param(params.minutes, state.config.history_max_minutes)?;
            Ok((validate_sensor_id(&sensor_id)?, window))
        });
    let (sensor_id, window) = request.map_err(|e| {
        state.metrics.record_query(query::HISTORY, outcome::REJECTED);
        AppError::from(e)
    })?;

    let points = state
        .service
        .history(&sensor_id, window)
        .await
        .map_err(|e| {
            state.metrics.record_query(query::HISTORY, outcome::ERROR);
            AppError::from(e)
        })?;

    tracing::debug!(
        "History for sensor {} over {}m: {} points",
        sensor_id,
        window.minutes(),
        points.len()
    );
    state.metrics.record_query(query::HISTORY, outcome::SUCCESS);
    Ok(Json(points))
}
