// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Timing of the daily schedule refresh that moves the "today" marker.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeZone};

/// Interval between refreshes once the first one has fired.
pub const DAILY: Duration = Duration::from_secs(24 * 60 * 60);

/// One second past midnight.
pub fn refresh_time() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 1).unwrap_or(NaiveTime::MIN)
}

/// Time left until 00:00:01 of the next calendar day in `now`'s zone.
///
/// Falls back to [`DAILY`] when the target does not exist locally (a DST gap
/// at midnight) or the calendar overflows.
pub fn until_next_refresh<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return DAILY;
    };
    let target = tomorrow.and_time(refresh_time());

    now.timezone()
        .from_local_datetime(&target)
        .earliest()
        .and_then(|at| at.signed_duration_since(now.clone()).to_std().ok())
        .unwrap_or(DAILY)
}
