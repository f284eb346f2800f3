// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod health;
mod ingest;
mod metrics;
mod read;

pub use health::{health_check, root};
pub use ingest::ingest_reading;
pub use metrics::metrics_handler;
pub use read::{latest_reading, sensor_history};
