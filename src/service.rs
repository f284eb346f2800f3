// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Sensor data operations on top of InfluxDB
//!
//! Maps validated readings to points and read requests to Flux queries.
//! Nothing is enforced locally beyond what validation already did.

use chrono::{DateTime, Utc};
use std::time::Instant;

use crate::influx::{FluxRecord, InfluxClient, InfluxError, Point, flux};
use crate::metrics::{MetricsRegistry, operation};
use crate::model::{HistoryPoint, HistoryWindow, LatestReading, ValidatedReading};

/// Measurement every sensor reading is written to
pub const MEASUREMENT: &str = "sensor_predictions";

/// Service layer for sensor reading storage and retrieval
#[derive(Clone)]
pub struct SensorService {
    client: InfluxClient,
    bucket: String,
    latest_lookback_days: u32,
    metrics: MetricsRegistry,
}

impl SensorService {
    pub fn new(
        client: InfluxClient,
        bucket: impl Into<String>,
        latest_lookback_days: u32,
        metrics: MetricsRegistry,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            latest_lookback_days,
            metrics,
        }
    }

    /// Writes a reading stamped with the current time
    ///
    /// Returns the timestamp the point was written with.
    pub async fn write_reading(
        &self,
        reading: &ValidatedReading,
    ) -> Result<DateTime<Utc>, InfluxError> {
        let timestamp = Utc::now();
        let point = Point::new(MEASUREMENT)
            .tag("sensor_id", reading.sensor_id())
            .tag("zone", reading.zone())
            .field("value", reading.value())
            .field("latency_ms", reading.latency_ms())
            .timestamp(timestamp);

        let start = Instant::now();
        let result = self.client.write(&self.bucket, &point).await;
        self.metrics.record_store_request(
            operation::WRITE,
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        result.map(|()| {
            tracing::debug!(
                "Stored reading for sensor {} in zone {}",
                reading.sensor_id(),
                reading.zone()
            );
            timestamp
        })
    }

    /// Most recent reading of `sensor_id`, if any exists in the lookback range
    pub async fn latest_reading(
        &self,
        sensor_id: &str,
    ) -> Result<Option<LatestReading>, InfluxError> {
        let query = flux::latest_reading(
            &self.bucket,
            MEASUREMENT,
            sensor_id,
            self.latest_lookback_days,
        );
        let records = self.run_query(&query).await?;

        Ok(records.first().map(|record| LatestReading {
            sensor_id: record.get("sensor_id").unwrap_or(sensor_id).to_string(),
            zone: record.get("zone").map(str::to_string),
            value: record.get_f64("value"),
            latency_ms: record.get_f64("latency_ms"),
            timestamp: record.time(),
        }))
    }

    /// Readings of `sensor_id` inside `window`, oldest first
    pub async fn history(
        &self,
        sensor_id: &str,
        window: HistoryWindow,
    ) -> Result<Vec<HistoryPoint>, InfluxError> {
        let query = flux::history(&self.bucket, MEASUREMENT, sensor_id, window.minutes());
        let records = self.run_query(&query).await?;

        Ok(records
            .iter()
            .map(|record| HistoryPoint {
                sensor_id: record.get("sensor_id").unwrap_or(sensor_id).to_string(),
                value: record.get_f64("value"),
                timestamp: record.time(),
            })
            .collect())
    }

    /// Checks that InfluxDB is reachable
    pub async fn ping(&self) -> Result<(), InfluxError> {
        let start = Instant::now();
        let result = self.client.ping().await;
        self.metrics.record_store_request(
            operation::PING,
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );
        result
    }

    async fn run_query(&self, query: &str) -> Result<Vec<FluxRecord>, InfluxError> {
        let start = Instant::now();
        let result = self.client.query(query).await;
        self.metrics.record_store_request(
            operation::QUERY,
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );
        result
    }
}
