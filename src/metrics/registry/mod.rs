// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and recording logic

mod init;
mod record;

use crate::metrics::labels::{OutcomeLabels, QueryLabels, StoreOperationLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    // request counters
    ingest_requests: Family<OutcomeLabels, Counter>,
    query_requests: Family<QueryLabels, Counter>,
    // store timing
    store_request_duration_milliseconds: Family<StoreOperationLabels, Gauge>,
    store_request_errors: Family<StoreOperationLabels, Counter>,
    // store liveness
    store_up: Gauge,
    store_probes: Family<OutcomeLabels, Counter>,
    store_last_success_timestamp_seconds: Gauge,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
