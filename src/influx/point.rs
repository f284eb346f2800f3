// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Line protocol point builder
//!
//! Format: `measurement,tag=value field=value timestamp`

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::InfluxError;

/// Typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    String(String),
    Boolean(bool),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Single time-series point
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    timestamp: Option<DateTime<Utc>>,
}

impl Point {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Renders the point as one line of line protocol (nanosecond precision)
    ///
    /// Tags are written sorted by key and tags with empty values are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when the point has no measurement or no fields, when
    /// a name or tag value contains a control character or ends in a
    /// backslash, for a non-finite float field, or for a timestamp outside
    /// the nanosecond range.
    pub fn to_line_protocol(&self) -> Result<String, InfluxError> {
        if self.measurement.is_empty() {
            return Err(InfluxError::InvalidPoint("empty measurement".to_string()));
        }
        if self.fields.is_empty() {
            return Err(InfluxError::InvalidPoint(format!(
                "point '{}' has no fields",
                self.measurement
            )));
        }

        let mut line = escape(&self.measurement, MEASUREMENT_SPECIALS)?;

        let mut tags: Vec<&(String, String)> =
            self.tags.iter().filter(|(_, v)| !v.is_empty()).collect();
        tags.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in tags {
            line.push(',');
            line.push_str(&escape(key, KEY_SPECIALS)?);
            line.push('=');
            line.push_str(&escape(value, KEY_SPECIALS)?);
        }

        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            line.push_str(&escape(key, KEY_SPECIALS)?);
            line.push('=');
            write_field_value(&mut line, key, value)?;
        }

        if let Some(ts) = self.timestamp {
            let nanos = ts.timestamp_nanos_opt().ok_or_else(|| {
                InfluxError::InvalidPoint(format!("timestamp {ts} out of range"))
            })?;
            let _ = write!(line, " {nanos}");
        }

        Ok(line)
    }
}

const MEASUREMENT_SPECIALS: &[char] = &[',', ' '];
const KEY_SPECIALS: &[char] = &[',', '=', ' '];

/// Escapes `specials` with a backslash; every other character is literal
///
/// Line protocol has no escape for line breaks or for a backslash that
/// precedes a special character or the following separator.
fn escape(raw: &str, specials: &[char]) -> Result<String, InfluxError> {
    if raw.chars().any(char::is_control) {
        return Err(InfluxError::InvalidPoint(format!(
            "'{}' contains a control character",
            raw.escape_debug()
        )));
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek().is_none_or(|next| specials.contains(next)) {
            return Err(InfluxError::InvalidPoint(format!(
                "'{raw}' has a backslash before a separator"
            )));
        }
        if specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Ok(out)
}

fn write_field_value(line: &mut String, key: &str, value: &FieldValue) -> Result<(), InfluxError> {
    match value {
        FieldValue::Float(v) => {
            if !v.is_finite() {
                return Err(InfluxError::InvalidPoint(format!(
                    "field '{key}' is not a finite number"
                )));
            }
            let _ = write!(line, "{v}");
        }
        FieldValue::Integer(v) => {
            let _ = write!(line, "{v}i");
        }
        FieldValue::Boolean(v) => {
            let _ = write!(line, "{v}");
        }
        FieldValue::String(v) => {
            line.push('"');
            for c in v.chars() {
                if c == '"' || c == '\\' {
                    line.push('\\');
                }
                line.push(c);
            }
            line.push('"');
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(nanos: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(nanos)
    }

    #[test]
    fn test_sensor_point() {
        let point = Point::new("sensor_predictions")
            .tag("sensor_id", "sensor_001")
            .tag("zone", "zone_A")
            .field("value", 42.5)
            .field("latency_ms", 12.3)
            .timestamp(ts(1_769_782_718_000_000_000));

        assert_eq!(
            point.to_line_protocol().unwrap(),
            "sensor_predictions,sensor_id=sensor_001,zone=zone_A value=42.5,latency_ms=12.3 1769782718000000000"
        );
    }

    #[test]
    fn test_tags_sorted_and_empty_dropped() {
        let point = Point::new("m")
            .tag("zone", "b")
            .tag("empty", "")
            .tag("alpha", "a")
            .field("v", 1.0);

        assert_eq!(point.to_line_protocol().unwrap(), "m,alpha=a,zone=b v=1");
    }

    #[test]
    fn test_escaping() {
        let point = Point::new("my measurement,x")
            .tag("tag key", "a=b,c d")
            .field("f=1", "say \"hi\" \\ bye");

        assert_eq!(
            point.to_line_protocol().unwrap(),
            r#"my\ measurement\,x,tag\ key=a\=b\,c\ d f\=1="say \"hi\" \\ bye""#
        );
    }

    #[test]
    fn test_backslash_in_tag_kept_literal() {
        let point = Point::new("m").tag("sensor_id", "a\\b").field("v", 1.0);
        assert_eq!(point.to_line_protocol().unwrap(), r"m,sensor_id=a\b v=1");
    }

    #[test]
    fn test_control_character_in_tag_rejected() {
        let err = Point::new("m")
            .tag("zone", "x\ny")
            .field("v", 1.0)
            .to_line_protocol()
            .unwrap_err();
        assert!(matches!(err, InfluxError::InvalidPoint(_)));
    }

    #[test]
    fn test_backslash_before_special_rejected() {
        let err = Point::new("m")
            .tag("zone", "a\\ b")
            .field("v", 1.0)
            .to_line_protocol()
            .unwrap_err();
        assert!(matches!(err, InfluxError::InvalidPoint(_)));
    }

    #[test]
    fn test_trailing_backslash_rejected() {
        let err = Point::new("m")
            .tag("zone", "x\\")
            .field("v", 1.0)
            .to_line_protocol()
            .unwrap_err();
        assert!(matches!(err, InfluxError::InvalidPoint(_)));
    }

    #[test]
    fn test_integer_field_suffix() {
        let point = Point::new("m").field("count", 7i64);
        assert_eq!(point.to_line_protocol().unwrap(), "m count=7i");
    }

    #[test]
    fn test_no_fields_rejected() {
        let err = Point::new("m").tag("a", "b").to_line_protocol().unwrap_err();
        assert!(matches!(err, InfluxError::InvalidPoint(_)));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = Point::new("m")
            .field("v", f64::NAN)
            .to_line_protocol()
            .unwrap_err();
        assert!(matches!(err, InfluxError::InvalidPoint(_)));
    }
}
