// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schedule view: services sorted by date and classified against today.

use chrono::{DateTime, NaiveDate, Utc};
use kliros_core::types::{ScheduleDocument, ServiceRecord, TimeSlot};

/// Message shown when the schedule has no services.
pub const EMPTY_SCHEDULE_MESSAGE: &str = "No services are scheduled yet.";

/// Icon used for time slots that don't name one.
pub const DEFAULT_TIME_ICON: &str = "bi bi-clock";

/// Where a service day sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Past,
    Today,
    Future,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Today => "today",
            Self::Future => "future",
        }
    }
}

/// Calendar-date comparison only; callers pass the device's local date.
pub fn classify(date: NaiveDate, today: NaiveDate) -> DayStatus {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => DayStatus::Past,
        std::cmp::Ordering::Equal => DayStatus::Today,
        std::cmp::Ordering::Greater => DayStatus::Future,
    }
}

/// Icon class for a time slot, falling back to the clock icon.
pub fn time_icon(slot: &TimeSlot) -> &str {
    slot.icon
        .as_deref()
        .filter(|icon| !icon.is_empty())
        .unwrap_or(DEFAULT_TIME_ICON)
}

/// One rendered service.
#[derive(Debug, Clone)]
pub struct ServiceView<'a> {
    pub record: &'a ServiceRecord,
    pub status: DayStatus,
}

/// Summary line under the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub total: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub week_period: Option<String>,
}

/// The whole rendered schedule.
#[derive(Debug, Clone)]
pub struct ScheduleView<'a> {
    pub items: Vec<ServiceView<'a>>,
    pub stats: ScheduleStats,
    /// Set when there is nothing to show.
    pub empty_message: Option<&'static str>,
}

impl ScheduleView<'_> {
    /// Position of the first service happening today, the auto-scroll target.
    pub fn today_index(&self) -> Option<usize> {
        self.items.iter().position(|s| s.status == DayStatus::Today)
    }
}

/// Render the schedule for `today`. Sorting is stable: services sharing a
/// date keep their document order.
pub fn render_schedule(doc: &ScheduleDocument, today: NaiveDate) -> ScheduleView<'_> {
    let mut records: Vec<&ServiceRecord> = doc.services.iter().collect();
    records.sort_by_key(|r| r.date);

    let items: Vec<ServiceView<'_>> = records
        .into_iter()
        .map(|record| ServiceView {
            record,
            status: classify(record.date, today),
        })
        .collect();

    let metadata = doc.metadata.as_ref();
    let stats = ScheduleStats {
        total: doc.services.len(),
        last_updated: metadata.and_then(|m| m.last_updated_at()),
        week_period: metadata.and_then(|m| m.week_period.clone()),
    };

    let empty_message = items.is_empty().then_some(EMPTY_SCHEDULE_MESSAGE);
    ScheduleView {
        items,
        stats,
        empty_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kliros_core::types::ScheduleMetadata;

    fn record(id: &str, date: NaiveDate) -> ServiceRecord {
        ServiceRecord {
            id: id.into(),
            date,
            day_number: 1,
            month: "января".into(),
            weekday: "среда".into(),
            title: format!("Служба {id}"),
            times: vec![TimeSlot {
                time: "8:00".into(),
                kind: "Литургия".into(),
                icon: None,
            }],
            note: None,
            priority: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn classification_around_today() {
        let today = day(15);
        assert_eq!(classify(day(14), today), DayStatus::Past);
        assert_eq!(classify(day(15), today), DayStatus::Today);
        assert_eq!(classify(day(16), today), DayStatus::Future);
    }

    #[test]
    fn timestamps_classify_by_date_only() {
        let late_evening = kliros_core::dates::parse_calendar_date("2025-01-15T23:59:00").unwrap();
        assert_eq!(classify(late_evening, day(15)), DayStatus::Today);
    }

    #[test]
    fn sorted_ascending_and_stable() {
        let doc = ScheduleDocument {
            metadata: None,
            services: vec![
                record("c", day(20)),
                record("a", day(10)),
                record("b1", day(15)),
                record("b2", day(15)),
            ],
        };
        let view = render_schedule(&doc, day(15));
        let ids: Vec<&str> = view.items.iter().map(|s| s.record.id.as_str()).collect();
        assert_eq!(ids, ["a", "b1", "b2", "c"]);
        assert_eq!(view.items.len(), doc.services.len());
        assert_eq!(view.today_index(), Some(1));
        assert_eq!(view.stats.total, 4);
        assert!(view.empty_message.is_none());
    }

    #[test]
    fn empty_schedule_shows_message_and_zero() {
        let doc = ScheduleDocument::default();
        let view = render_schedule(&doc, day(1));
        assert!(view.items.is_empty());
        assert_eq!(view.stats.total, 0);
        assert_eq!(view.empty_message, Some(EMPTY_SCHEDULE_MESSAGE));
        assert_eq!(view.today_index(), None);
    }

    #[test]
    fn stats_read_metadata() {
        let doc = ScheduleDocument {
            metadata: Some(ScheduleMetadata {
                last_updated: Some("2025-01-05T12:00:00Z".into()),
                version: Some("1.0".into()),
                week_period: Some("6–12 января".into()),
            }),
            services: vec![record("a", day(6))],
        };
        let view = render_schedule(&doc, day(6));
        assert_eq!(view.stats.week_period.as_deref(), Some("6–12 января"));
        assert_eq!(
            view.stats.last_updated.unwrap().to_rfc3339(),
            "2025-01-05T12:00:00+00:00"
        );
    }

    #[test]
    fn missing_icon_falls_back_to_clock() {
        let mut slot = record("a", day(6)).times.remove(0);
        assert_eq!(time_icon(&slot), "bi bi-clock");
        slot.icon = Some(String::new());
        assert_eq!(time_icon(&slot), "bi bi-clock");
        slot.icon = Some("bi bi-sun".into());
        assert_eq!(time_icon(&slot), "bi bi-sun");
    }
}
