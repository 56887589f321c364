// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calendar-date parsing shared by the schedule and news documents.
//
// Documents carry either a bare `YYYY-MM-DD` or a full timestamp. Only the
// calendar date matters for sorting and classification.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a document date into a calendar date.
///
/// Accepts `2025-01-07`, `2025-01-07T10:00:00`, and RFC 3339 timestamps.
/// For timestamps with an offset the date is taken as written, not converted.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts.date());
    }
    None
}

/// Serde adapter for `NaiveDate` fields using [`parse_calendar_date`].
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("not a calendar date: {raw}")))
    }
}
