//! InfluxDB 2.x HTTP API client module
//!
//! This module renders points as line protocol, builds Flux queries,
//! parses annotated CSV query results and talks to the store over HTTP.

mod client;
mod error;
pub mod flux;
mod point;
mod record;

// Re-export public types and functions
pub use client::InfluxClient;
pub use error::InfluxError;
pub use point::{FieldValue, Point};
pub use record::{FluxRecord, parse_csv_response};
