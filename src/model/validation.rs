// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Input validation for sensor readings and query parameters

use thiserror::Error;

use super::SensorReading;

/// Reason a request was rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty or whitespace")]
    Blank(&'static str),

    #[error("{0} cannot contain backslashes or control characters")]
    InvalidCharacter(&'static str),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("{0} must be greater than or equal to 0")]
    Negative(&'static str),

    #[error("minutes must be between 1 and {max}, got {got}")]
    WindowOutOfRange { got: i64, max: u32 },

    #[error("Invalid request body: {0}")]
    Body(String),

    #[error("Invalid query string: {0}")]
    Query(String),
}

/// Sensor reading that passed validation
///
/// String fields are stored trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReading {
    sensor_id: String,
    zone: String,
    value: f64,
    latency_ms: f64,
}

impl ValidatedReading {
    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }
}

/// Trims an identifier stored as a tag
///
/// Backslashes and control characters are refused so the stored tag value
/// is byte-identical to what later queries match against.
fn identifier(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    if trimmed.chars().any(|c| c == '\\' || c.is_control()) {
        return Err(ValidationError::InvalidCharacter(field));
    }
    Ok(trimmed.to_string())
}

/// Validates a sensor id taken from a request path
pub fn validate_sensor_id(raw: &str) -> Result<String, ValidationError> {
    identifier("sensor_id", raw)
}

impl SensorReading {
    /// Validates the reading and normalizes its string fields
    pub fn validate(&self) -> Result<ValidatedReading, ValidationError> {
        let sensor_id = identifier("sensorId", &self.sensor_id)?;
        let zone = identifier("zone", &self.zone)?;

        if !self.value.is_finite() {
            return Err(ValidationError::NotFinite("value"));
        }

        if !self.latency_ms.is_finite() {
            return Err(ValidationError::NotFinite("latencyMs"));
        }
        if self.latency_ms < 0.0 {
            return Err(ValidationError::Negative("latencyMs"));
        }

        Ok(ValidatedReading {
            sensor_id,
            zone,
            value: self.value,
            // -0.0 passes the check above, store it as plain zero
            latency_ms: self.latency_ms + 0.0,
        })
    }
}

/// Bounded lookback window for history queries, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    minutes: u32,
}

impl HistoryWindow {
    pub const DEFAULT_MINUTES: u32 = 60;

    /// Builds a window of `minutes`, which must lie in `1..=max_minutes`
    pub fn new(minutes: i64, max_minutes: u32) -> Result<Self, ValidationError> {
        match u32::try_from(minutes) {
            Ok(m) if m >= 1 && m <= max_minutes => Ok(Self { minutes: m }),
            _ => Err(ValidationError::WindowOutOfRange {
                got: minutes,
                max: max_minutes,
            }),
        }
    }

    /// Window for an optional query parameter, falling back to the default
    pub fn from_param(minutes: Option<i64>, max_minutes: u32) -> Result<Self, ValidationError> {
        Self::new(
            minutes.unwrap_or(i64::from(Self::DEFAULT_MINUTES)),
            max_minutes,
        )
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}
