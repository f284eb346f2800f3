// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Background InfluxDB liveness probe
//!
//! Pings the store on a fixed interval and keeps the last observed status
//! for the health endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::AppState;

/// Store reachability as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// No probe has completed yet
    Unknown,
    Connected,
    Disconnected,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Connected,
            2 => Self::Disconnected,
            _ => Self::Unknown,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Connected => 1,
            Self::Disconnected => 2,
        }
    }
}

/// Shared, lock-free holder of the last [`StoreStatus`]
#[derive(Clone, Default)]
pub struct StoreHealth {
    status: Arc<AtomicU8>,
}

impl StoreHealth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    /// Records a probe result and returns the previous status
    pub fn record(&self, reachable: bool) -> StoreStatus {
        let next = if reachable {
            StoreStatus::Connected
        } else {
            StoreStatus::Disconnected
        };
        StoreStatus::from_u8(self.status.swap(next.to_u8(), Ordering::Relaxed))
    }
}

/// Pings the store once and records the outcome
pub async fn probe_once(state: &AppState) -> StoreStatus {
    let result = state.service.ping().await;
    let reachable = result.is_ok();
    let previous = state.store_health.record(reachable);
    state.metrics.record_probe(reachable);

    match (&result, previous) {
        (Ok(()), StoreStatus::Disconnected) => {
            tracing::info!("InfluxDB connection restored");
        }
        (Ok(()), _) => tracing::trace!("InfluxDB ping ok"),
        (Err(e), StoreStatus::Disconnected) => {
            tracing::debug!("InfluxDB still unreachable: {}", e);
        }
        (Err(e), _) => tracing::warn!("InfluxDB unreachable: {}", e),
    }

    state.store_health.status()
}

/// Starts the background probe loop
///
/// Probes every `Config::health_probe_interval_secs`, starting one interval
/// after the call since startup already ran [`probe_once`].
pub fn start_probe_loop(
    mut shutdown_rx: watch::Receiver<bool>,
    state: Arc<AppState>,
) -> JoinHandle<()> {
    let interval = state.config.health_probe_interval_secs;
    tracing::info!("Starting InfluxDB probe loop every {}s", interval);

    tokio::spawn(async move {
        let period = std::time::Duration::from_secs(interval);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Stopping probe loop");
                        break;
                    }
                }
            }

            probe_once(&state).await;
        }
    })
}
