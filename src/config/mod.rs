// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the sensor gateway
//!
//! Loads configuration from environment variables (and a `.env` file).

use secrecy::{ExposeSecret, SecretString};


/// Default configuration values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const INFLUX_URL: &str = "http://localhost:8086";
    pub const INFLUX_TIMEOUT_SECS: u64 = 10;
    pub const HISTORY_MAX_MINUTES: u32 = 43_200;
    pub const LATEST_LOOKBACK_DAYS: u32 = 30;
    pub const HEALTH_PROBE_INTERVAL_SECS: u64 = 30;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const INFLUX_URL: &str = "INFLUX_URL";
    pub const INFLUX_TOKEN: &str = "INFLUX_TOKEN";
    pub const INFLUX_ORG: &str = "INFLUX_ORG";
    pub const INFLUX_BUCKET: &str = "INFLUX_BUCKET";
    pub const INFLUX_TIMEOUT_SECONDS: &str = "INFLUX_TIMEOUT_SECONDS";
    pub const HISTORY_MAX_MINUTES: &str = "HISTORY_MAX_MINUTES";
    pub const LATEST_LOOKBACK_DAYS: &str = "LATEST_LOOKBACK_DAYS";
    pub const HEALTH_PROBE_INTERVAL_SECONDS: &str = "HEALTH_PROBE_INTERVAL_SECONDS";

    /// Older `INFLUXDB_*` spellings, accepted as fallbacks
    pub const INFLUXDB_URL: &str = "INFLUXDB_URL";
    pub const INFLUXDB_TOKEN: &str = "INFLUXDB_TOKEN";
    pub const INFLUXDB_ORG: &str = "INFLUXDB_ORG";
}

/// Connection settings for the InfluxDB 2.x HTTP API
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub token: SecretString,
    pub org: String,
    pub bucket: String,
    pub timeout_secs: u64,
}

impl InfluxConfig {
    /// Validates InfluxDB settings
    pub fn validate(&self) -> Result<(), String> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(format!(
                "Invalid InfluxDB URL '{}': expected http:// or https://",
                self.url
            ));
        }

        if self.token.expose_secret().trim().is_empty() {
            return Err(format!("{} is required", env_vars::INFLUX_TOKEN));
        }

        if self.org.trim().is_empty() {
            return Err(format!("{} is required", env_vars::INFLUX_ORG));
        }

        if self.bucket.trim().is_empty() {
            return Err(format!("{} is required", env_vars::INFLUX_BUCKET));
        }

        if self.timeout_secs == 0 {
            return Err("InfluxDB timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

impl Default for InfluxConfig {
    fn default() -> Self {
        InfluxConfig {
            url: defaults::INFLUX_URL.to_string(),
            token: SecretString::from(String::new()),
            org: String::new(),
            bucket: String::new(),
            timeout_secs: defaults::INFLUX_TIMEOUT_SECS,
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub influx: InfluxConfig,
    pub history_max_minutes: u32,
    pub latest_lookback_days: u32,
    pub health_probe_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: format!("{}:{}", defaults::HOST, defaults::PORT),
            influx: InfluxConfig::default(),
            history_max_minutes: defaults::HISTORY_MAX_MINUTES,
            latest_lookback_days: defaults::LATEST_LOOKBACK_DAYS,
            health_probe_interval_secs: defaults::HEALTH_PROBE_INTERVAL_SECS,
        }
    }
}

/// Parses a numeric variable, falling back to `default` with a warning
fn parse_or<T: std::str::FromStr + Copy>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => v.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{}' for {}. Using default.", v, name);
            default
        }),
        None => default,
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// `.env` is not read here; `main` loads it before tracing starts.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |primary: &str, fallback: &str| var(primary).or_else(|| var(fallback));

        let server_addr = var(env_vars::SERVER_ADDR).unwrap_or_else(|| {
            let host = var(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string());
            let port = parse_or(env_vars::PORT, var(env_vars::PORT), defaults::PORT);
            format!("{host}:{port}")
        });

        let influx = InfluxConfig {
            url: var_or(env_vars::INFLUX_URL, env_vars::INFLUXDB_URL)
                .unwrap_or_else(|| defaults::INFLUX_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token: SecretString::from(
                var_or(env_vars::INFLUX_TOKEN, env_vars::INFLUXDB_TOKEN).unwrap_or_default(),
            ),
            org: var_or(env_vars::INFLUX_ORG, env_vars::INFLUXDB_ORG).unwrap_or_default(),
            bucket: var(env_vars::INFLUX_BUCKET).unwrap_or_default(),
            timeout_secs: parse_or(
                env_vars::INFLUX_TIMEOUT_SECONDS,
                var(env_vars::INFLUX_TIMEOUT_SECONDS),
                defaults::INFLUX_TIMEOUT_SECS,
            ),
        };

        Config {
            server_addr,
            influx,
            history_max_minutes: parse_or(
                env_vars::HISTORY_MAX_MINUTES,
                var(env_vars::HISTORY_MAX_MINUTES),
                defaults::HISTORY_MAX_MINUTES,
            ),
            latest_lookback_days: parse_or(
                env_vars::LATEST_LOOKBACK_DAYS,
                var(env_vars::LATEST_LOOKBACK_DAYS),
                defaults::LATEST_LOOKBACK_DAYS,
            ),
            health_probe_interval_secs: parse_or(
                env_vars::HEALTH_PROBE_INTERVAL_SECONDS,
                var(env_vars::HEALTH_PROBE_INTERVAL_SECONDS),
                defaults::HEALTH_PROBE_INTERVAL_SECS,
            ),
        }
    }

    /// Validates the whole configuration
    pub fn validate(&self) -> Result<(), String> {
        self.influx.validate()?;

        if self.history_max_minutes == 0 {
            return Err(format!("{} must be at least 1", env_vars::HISTORY_MAX_MINUTES));
        }

        if self.latest_lookback_days == 0 {
            return Err(format!("{} must be at least 1", env_vars::LATEST_LOOKBACK_DAYS));
        }

        if self.health_probe_interval_secs == 0 {
            return Err(format!(
                "{} must be at least 1",
                env_vars::HEALTH_PROBE_INTERVAL_SECONDS
            ));
        }

        Ok(())
    }
}
