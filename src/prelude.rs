// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use sensor_gateway::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, InfluxConfig};
pub use crate::error::{AppError, Result};

// HTTP surface
pub use crate::api::{AppState, create_router};
pub use crate::probe::{StoreHealth, StoreStatus};

// Metrics
pub use crate::metrics::MetricsRegistry;

// Store access
pub use crate::influx::{InfluxClient, InfluxError, Point};
pub use crate::service::SensorService;

// Wire types
pub use crate::model::{
    HistoryPoint, HistoryWindow, IngestResponse, LatestReadingResponse, SensorReading,
    ValidationError,
};
