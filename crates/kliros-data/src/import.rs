// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schedule import from JSON or CSV files into the admin editor buffer.
//
// Imported data is returned as a raw JSON value so the editor can show it
// before anything is validated or saved.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};
use tracing::{info, instrument};

use kliros_core::error::{KlirosError, Result};

pub const IMPORTED_WEEK_PERIOD: &str = "Импортированное расписание";
pub const DEFAULT_TIME: &str = "8:00";
pub const DEFAULT_SERVICE_TYPE: &str = "Богослужение";
pub const DEFAULT_TIME_ICON: &str = "bi-clock";

/// Supported import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(KlirosError::UnsupportedFormat(ext)),
        }
    }
}

/// Read and convert `path`. Nothing is validated here.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn import_file(path: &Path) -> Result<Value> {
    let format = ImportFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path).await?;
    let value = parse_import(format, &text, Utc::now())?;
    info!(?format, "file imported");
    Ok(value)
}

pub fn parse_import(format: ImportFormat, text: &str, now: DateTime<Utc>) -> Result<Value> {
    match format {
        ImportFormat::Json => Ok(serde_json::from_str(text)?),
        ImportFormat::Csv => parse_csv(text, now),
    }
}

/// Positional CSV: the first row is a header and is skipped without looking at
/// names. Columns are date, dayNumber, month, weekday, title, time, type,
/// note, priority. Blank cells take defaults.
pub fn parse_csv(text: &str, now: DateTime<Utc>) -> Result<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut services = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(std::io::Error::from)?;
        let cell = |i: usize| row.get(i).unwrap_or("");
        let or_default = |i: usize, default: &'static str| match cell(i) {
            "" => default,
            value => value,
        };

        services.push(json!({
            "id": format!("imported-{}", index + 1),
            "date": cell(0),
            "dayNumber": leading_int(cell(1)).filter(|n| *n != 0).unwrap_or(1),
            "month": cell(2),
            "weekday": cell(3),
            "title": cell(4),
            "times": [{
                "time": or_default(5, DEFAULT_TIME),
                "type": or_default(6, DEFAULT_SERVICE_TYPE),
                "icon": DEFAULT_TIME_ICON,
            }],
            "note": cell(7),
            "priority": or_default(8, "medium"),
        }));
    }

    Ok(json!({
        "metadata": {
            "lastUpdated": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "version": "1.0",
            "weekPeriod": IMPORTED_WEEK_PERIOD,
        },
        "services": services,
    }))
}

/// Integer prefix of `s` (`"12th"` is 12), like a lenient `parseInt`.
fn leading_int(s: &str) -> Option<i64> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
