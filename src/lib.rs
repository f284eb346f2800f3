// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Sensor Gateway
//!
//! HTTP façade over InfluxDB for sensor readings.
//!
//! Sensors POST readings which are stored as tagged points; clients read
//! back the latest value of a sensor or a bounded history window.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `config`: configuration management
//! - `error`: error types
//! - `influx`: InfluxDB line protocol, Flux and HTTP client
//! - `metrics`: Prometheus metrics registry
//! - `model`: request/response types and validation
//! - `probe`: background InfluxDB liveness probe
//! - `service`: sensor data operations
//! - `prelude`: commonly used types and traits

mod api;
mod config;
mod error;
mod influx;
mod metrics;
mod model;
mod probe;
mod service;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, InfluxConfig};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// Store liveness probe
pub use probe::{StoreHealth, StoreStatus, probe_once, start_probe_loop};

/// Metrics registry and label values
pub use metrics::{MetricsRegistry, operation, outcome, query};

/// InfluxDB client and line protocol types
pub use influx::{FieldValue, FluxRecord, InfluxClient, InfluxError, Point, flux, parse_csv_response};

/// Request and response types
pub use model::{
    ErrorResponse, HistoryPoint, HistoryWindow, IngestResponse, LatestReading,
    LatestReadingResponse, SensorReading, ValidatedReading, ValidationError,
};

/// Sensor data service
pub use service::{MEASUREMENT, SensorService};
