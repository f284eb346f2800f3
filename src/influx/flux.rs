// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Flux query templates
//!
//! User-provided values are only ever embedded through [`string_literal`].

/// Quotes `raw` as a Flux string literal
pub fn string_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            // `${` opens string interpolation
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shared source, filter and pivot stages for one sensor's rows
fn sensor_rows(bucket: &str, measurement: &str, sensor_id: &str, range_start: &str) -> String {
    format!(
        r#"from(bucket: {bucket})
    |> range(start: {range_start})
    |> filter(fn: (r) => r["_measurement"] == {measurement})
    |> filter(fn: (r) => r["sensor_id"] == {sensor_id})
    |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")
    |> group()"#,
        bucket = string_literal(bucket),
        measurement = string_literal(measurement),
        sensor_id = string_literal(sensor_id),
    )
}

/// Most recent row of a sensor within the last `lookback_days`
///
/// Rows are regrouped before sorting so a sensor that changed zones still
/// yields a single newest row.
pub fn latest_reading(bucket: &str, measurement: &str, sensor_id: &str, lookback_days: u32) -> String {
    format!(
        "{}\n    |> sort(columns: [\"_time\"], desc: true)\n    |> limit(n: 1)",
        sensor_rows(bucket, measurement, sensor_id, &format!("-{lookback_days}d"))
    )
}

/// All rows of a sensor within the last `minutes`, oldest first
pub fn history(bucket: &str, measurement: &str, sensor_id: &str, minutes: u32) -> String {
    format!(
        "{}\n    |> sort(columns: [\"_time\"], desc: false)",
        sensor_rows(bucket, measurement, sensor_id, &format!("-{minutes}m"))
    )
}
