// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Flux query result parsing
//!
//! InfluxDB answers `/api/v2/query` with (annotated) CSV: one header row per
//! table, tables separated by blank lines, optional `#` annotation rows.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::InfluxError;

/// One result row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxRecord {
    values: HashMap<String, String>,
}

impl FluxRecord {
    /// Non-empty cell value of `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(|v| v.parse().ok())
    }

    /// Parsed `_time` column
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.get("_time")
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FluxRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Splits a CSV body into rows, honouring quoted cells
///
/// A blank line yields an empty row.
fn split_rows(body: &str) -> Result<Vec<Vec<String>>, InfluxError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line_has_content = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                c => cell.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                line_has_content = true;
            }
            ',' => {
                row.push(std::mem::take(&mut cell));
                line_has_content = true;
            }
            '\r' => {}
            '\n' => {
                if line_has_content {
                    row.push(std::mem::take(&mut cell));
                }
                rows.push(std::mem::take(&mut row));
                line_has_content = false;
            }
            c => {
                cell.push(c);
                line_has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(InfluxError::Response("unterminated quoted cell".to_string()));
    }
    if line_has_content {
        row.push(cell);
        rows.push(row);
    }

    Ok(rows)
}

/// Parses a query response body into records
///
/// # Errors
///
/// Returns [`InfluxError::Query`] when the body carries an error table and
/// [`InfluxError::Response`] when the CSV itself is malformed.
pub fn parse_csv_response(body: &str) -> Result<Vec<FluxRecord>, InfluxError> {
    let mut records = Vec::new();
    let mut header: Option<Vec<String>> = None;

    for row in split_rows(body)? {
        if row.is_empty() || row.iter().all(String::is_empty) {
            header = None;
            continue;
        }
        if row[0].starts_with('#') {
            header = None;
            continue;
        }

        let Some(columns) = header.as_ref() else {
            header = Some(row);
            continue;
        };
        if *columns == row {
            continue;
        }
        if row.len() != columns.len() {
            return Err(InfluxError::Response(format!(
                "row has {} cells, header has {}",
                row.len(),
                columns.len()
            )));
        }

        let record: FluxRecord = columns.iter().cloned().zip(row).collect();

        // Runtime failures arrive as a two-column `error,reference` table
        if !columns.iter().any(|c| c == "_time" || c == "_value") {
            if let Some(message) = record.get("error") {
                return Err(InfluxError::Query(message.to_string()));
            }
        }

        records.push(record);
    }

    Ok(records)
}
