//! High-level InfluxDB client

use reqwest::{StatusCode, header};
use secrecy::ExposeSecret;
use serde_json::json;
use std::time::Duration;

use super::{FluxRecord, InfluxError, Point, parse_csv_response};
use crate::config::InfluxConfig;

/// InfluxDB 2.x HTTP API client
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct InfluxClient {
    http: reqwest::Client,
    base_url: String,
    org: String,
}

impl InfluxClient {
    /// Creates a client that authenticates every request with the API token
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &InfluxConfig) -> Result<Self, InfluxError> {
        let mut auth = header::HeaderValue::from_str(&format!(
            "Token {}",
            config.token.expose_secret()
        ))
        .map_err(|e| InfluxError::Client(format!("invalid token header: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
        })
    }

    /// Writes one point to `bucket` with nanosecond precision
    pub async fn write(&self, bucket: &str, point: &Point) -> Result<(), InfluxError> {
        let body = point.to_line_protocol()?;
        tracing::trace!("Writing line protocol to bucket {}: {}", bucket, body);

        let response = self
            .http
            .post(format!("{}/api/v2/write", self.base_url))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", bucket),
                ("precision", "ns"),
            ])
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    /// Runs a Flux query and returns every result row
    pub async fn query(&self, flux: &str) -> Result<Vec<FluxRecord>, InfluxError> {
        tracing::trace!("Running Flux query: {}", flux);

        let response = self
            .http
            .post(format!("{}/api/v2/query", self.base_url))
            .query(&[("org", self.org.as_str())])
            .header(header::ACCEPT, "application/csv")
            .json(&json!({
                "query": flux,
                "type": "flux",
                "dialect": {
                    "header": true,
                    "delimiter": ",",
                    "annotations": [],
                    "commentPrefix": "#",
                    "dateTimeFormat": "RFC3339Nano",
                },
            }))
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        parse_csv_response(&body)
    }

    /// Checks that the server answers `/ping`
    pub async fn ping(&self) -> Result<(), InfluxError> {
        let response = self
            .http
            .get(format!("{}/ping", self.base_url))
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }
}

/// Turns a non-2xx response into [`InfluxError::Api`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, InfluxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(InfluxError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Extracts the `message` of an InfluxDB JSON error body, or the raw body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
