// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Errors raised while talking to InfluxDB

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfluxError {
    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the InfluxDB API
    #[error("InfluxDB returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Client cannot be built from the given settings
    #[error("invalid client configuration: {0}")]
    Client(String),

    /// Point cannot be rendered as line protocol
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    /// Query result could not be parsed
    #[error("malformed query response: {0}")]
    Response(String),

    /// Flux runtime error reported inside a successful response
    #[error("query failed: {0}")]
    Query(String),
}
