// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request and response types for the sensor API
//!
//! Wire field names follow the frontend contract: camelCase for ingest and
//! latest-reading payloads, snake_case for history points.

mod validation;

pub use validation::{HistoryWindow, ValidatedReading, ValidationError, validate_sensor_id};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensor reading as posted by a physical sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: String,
    pub zone: String,
    pub value: f64,
    pub latency_ms: f64,
}

/// Response for a successfully stored reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
}

impl IngestResponse {
    pub fn new(sensor_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            message: "Data ingested successfully".to_string(),
            sensor_id: sensor_id.into(),
            timestamp,
        }
    }
}

/// Most recent reading of a sensor as read back from the store
///
/// Every column is optional: the store returns whatever the pivot produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub sensor_id: String,
    pub zone: Option<String>,
    pub value: Option<f64>,
    pub latency_ms: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response for `GET /api/latest/{sensor_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReadingResponse {
    pub sensor_id: String,
    pub zone: Option<String>,
    pub value: Option<f64>,
    pub latency_ms: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub found: bool,
}

impl LatestReadingResponse {
    /// Response for a sensor with no data in the lookback range
    pub fn not_found(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            zone: None,
            value: None,
            latency_ms: None,
            timestamp: None,
            found: false,
        }
    }
}

impl From<LatestReading> for LatestReadingResponse {
    fn from(reading: LatestReading) -> Self {
        Self {
            sensor_id: reading.sensor_id,
            zone: reading.zone,
            value: reading.value,
            latency_ms: reading.latency_ms,
            timestamp: reading.timestamp,
            found: true,
        }
    }
}

/// Single point of a sensor history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub sensor_id: String,
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Query string of `GET /api/history/{sensor_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub minutes: Option<i64>,
}

/// Error body returned for every non-2xx API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}
