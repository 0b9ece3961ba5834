//! Turns raw string-valued rows into typed [`Record`]s.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::{Record, SchoolType};
use crate::schema::{self, Metric, Resource, FLAG_PRESENT};

/// A row as handed over by the CSV parser: column name to cell text.
pub type RawRow = HashMap<String, String>;

/// Parses a score cell. Blank cells coerce to zero; anything else that is not
/// a number becomes NaN and is left to flow into downstream means.
///
/// Infinity is only accepted when spelled `Infinity` (optionally signed) or
/// reached by overflow such as `1e400`; shorthands like `inf` are not numbers
/// in the source data.
pub fn parse_score(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_infinite() => {
            let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
            let overflowed = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.');
            if unsigned == "Infinity" || overflowed {
                value
            } else {
                f64::NAN
            }
        }
        Ok(value) => value,
        Err(_) => f64::NAN,
    }
}

pub fn normalize_row(row: &RawRow) -> Record {
    let cell = |column: &str| row.get(column).map(String::as_str);

    let mut scores = [0.0; Metric::ALL.len()];
    for metric in Metric::ALL {
        scores[metric.index()] = match cell(metric.column()) {
            Some(value) => parse_score(value) / metric.divisor(),
            None => f64::NAN,
        };
    }

    let mut resources = [false; Resource::ALL.len()];
    for resource in Resource::ALL {
        resources[resource.index()] = cell(resource.column()) == Some(FLAG_PRESENT);
    }

    Record {
        zone: cell(schema::ZONE_COLUMN).unwrap_or_default().to_string(),
        school_type: SchoolType::from_label(cell(schema::SCHOOL_TYPE_COLUMN).unwrap_or_default()),
        gender: cell(schema::GENDER_COLUMN).unwrap_or_default().to_string(),
        scores,
        resources,
    }
}

pub fn normalize(rows: &[RawRow]) -> Vec<Record> {
    rows.iter().map(normalize_row).collect()
}

/// Parses CSV text into raw rows, rejecting headers that lack a schema column.
pub fn read_rows<R: std::io::Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in schema::required_columns() {
        if !headers.iter().any(|header| header == column) {
            return Err(DashboardError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = headers.len(), "parsed csv");
    Ok(rows)
}

/// Reads and normalizes the whole data file.
pub async fn load_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let rows = read_rows(bytes.as_slice())?;
    let records = normalize(&rows);
    info!(path = %path.display(), records = records.len(), "loaded student records");
    Ok(records)
}
