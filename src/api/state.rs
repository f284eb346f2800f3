// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::influx::InfluxClient;
use crate::metrics::MetricsRegistry;
use crate::probe::StoreHealth;
use crate::service::SensorService;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsRegistry,
    pub service: SensorService,
    pub store_health: StoreHealth,
}

impl AppState {
    /// Builds the InfluxDB client and service from configuration
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the InfluxDB client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let metrics = MetricsRegistry::new();
        let client = InfluxClient::new(&config.influx)
            .map_err(|e| AppError::Config(format!("Failed to build InfluxDB client: {e}")))?;
        let service = SensorService::new(
            client,
            config.influx.bucket.clone(),
            config.latest_lookback_days,
            metrics.clone(),
        );

        Ok(Self {
            config,
            metrics,
            service,
            store_health: StoreHealth::new(),
        })
    }
}
