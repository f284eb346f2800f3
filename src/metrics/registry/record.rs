// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Recording helpers and text encoding

use crate::metrics::labels::{OutcomeLabels, QueryLabels, StoreOperationLabels, outcome};
use prometheus_client::encoding::text::encode;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub async fn encode_metrics(&self) -> Result<String, std::fmt::Error> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }

    pub fn record_ingest(&self, outcome: &str) {
        self.ingest_requests
            .get_or_create(&OutcomeLabels::new(outcome))
            .inc();
    }

    pub fn record_query(&self, kind: &str, outcome: &str) {
        self.query_requests
            .get_or_create(&QueryLabels::new(kind, outcome))
            .inc();
    }

    /// Records the duration of one store request and whether it failed
    pub fn record_store_request(&self, operation: &str, duration_secs: f64, success: bool) {
        let labels = StoreOperationLabels::new(operation);
        // Store as milliseconds for better precision
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.store_request_duration_milliseconds
            .get_or_create(&labels)
            .set(millis);
        if !success {
            self.store_request_errors.get_or_create(&labels).inc();
        }
    }

    pub fn record_probe(&self, success: bool) {
        if success {
            self.store_probes
                .get_or_create(&OutcomeLabels::new(outcome::SUCCESS))
                .inc();
            self.store_up.set(1);
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            #[allow(clippy::cast_possible_wrap)]
            self.store_last_success_timestamp_seconds.set(now as i64);
        } else {
            self.store_probes
                .get_or_create(&OutcomeLabels::new(outcome::ERROR))
                .inc();
            self.store_up.set(0);
        }
    }

    pub fn get_ingest_count(&self, outcome: &str) -> u64 {
        self.ingest_requests
            .get_or_create(&OutcomeLabels::new(outcome))
            .get()
    }

    pub fn get_query_count(&self, kind: &str, outcome: &str) -> u64 {
        self.query_requests
            .get_or_create(&QueryLabels::new(kind, outcome))
            .get()
    }

    pub fn get_store_error_count(&self, operation: &str) -> u64 {
        self.store_request_errors
            .get_or_create(&StoreOperationLabels::new(operation))
            .get()
    }

    pub fn get_store_up(&self) -> i64 {
        self.store_up.get()
    }
}
