// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry initialization and metric registration

use crate::metrics::labels::{
    OutcomeLabels, QueryLabels, StoreOperationLabels, operation, outcome, query,
};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let ingest_requests = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "sensor_gateway_ingest",
            "Ingest requests by outcome (success, rejected, error)",
            ingest_requests.clone(),
        );
        let query_requests = Family::<QueryLabels, Counter>::default();
        registry.register(
            "sensor_gateway_queries",
            "Read requests by query kind and outcome",
            query_requests.clone(),
        );
        let store_request_duration_milliseconds =
            Family::<StoreOperationLabels, Gauge>::default();
        registry.register(
            "sensor_gateway_store_request_duration_milliseconds",
            "Duration of the last InfluxDB request in milliseconds",
            store_request_duration_milliseconds.clone(),
        );
        let store_request_errors = Family::<StoreOperationLabels, Counter>::default();
        registry.register(
            "sensor_gateway_store_request_errors",
            "Failed InfluxDB requests by operation",
            store_request_errors.clone(),
        );
        let store_up = Gauge::default();
        registry.register(
            "sensor_gateway_store_up",
            "InfluxDB reachability from the last probe (1=up,0=down)",
            store_up.clone(),
        );
        let store_probes = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "sensor_gateway_store_probe",
            "InfluxDB liveness probes by outcome",
            store_probes.clone(),
        );
        let store_last_success_timestamp_seconds = Gauge::default();
        registry.register(
            "sensor_gateway_store_last_success_timestamp_seconds",
            "Unix timestamp of the last successful probe",
            store_last_success_timestamp_seconds.clone(),
        );

        // Pre-create known series so rates work from the first scrape
        for o in [outcome::SUCCESS, outcome::REJECTED, outcome::ERROR] {
            let _ = ingest_requests.get_or_create(&OutcomeLabels::new(o));
            for kind in [query::LATEST, query::HISTORY] {
                let _ = query_requests.get_or_create(&QueryLabels::new(kind, o));
            }
        }
        for o in [outcome::SUCCESS, outcome::ERROR] {
            let _ = store_probes.get_or_create(&OutcomeLabels::new(o));
        }
        for op in [operation::WRITE, operation::QUERY, operation::PING] {
            let _ = store_request_errors.get_or_create(&StoreOperationLabels::new(op));
        }

        Self {
            registry: Arc::new(Mutex::new(registry)),
            ingest_requests,
            query_requests,
            store_request_duration_milliseconds,
            store_request_errors,
            store_up,
            store_probes,
            store_last_success_timestamp_seconds,
        }
    }
}
