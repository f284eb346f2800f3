// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry for the sensor gateway
//!
//! Contains label types and the Prometheus metrics registry.

mod labels;
mod registry;


/// Label values for request outcomes and store operations
pub use labels::{operation, outcome, query};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
