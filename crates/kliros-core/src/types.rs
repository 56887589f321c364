// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Kliros schedule and news documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::dates::calendar_date;

/// The two static documents the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Schedule,
    News,
}

impl DocumentKind {
    /// File name of the static resource, relative to the source root.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Schedule => "schedule-data.json",
            Self::News => "news-data.json",
        }
    }

    /// Name of the top-level record array.
    pub fn records_field(&self) -> &'static str {
        match self {
            Self::Schedule => "services",
            Self::News => "news",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::News => "news",
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Visual weight of a service in the schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One time slot within a service day (e.g. "8:00 Литургия").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A single day of services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub day_number: u8,
    pub month: String,
    pub weekday: String,
    pub title: String,
    /// Never empty once validated.
    pub times: Vec<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ServiceRecord {
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetadata {
    /// Kept as written; parse with [`ScheduleMetadata::last_updated_at`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_period: Option<String>,
}

impl ScheduleMetadata {
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// The schedule document (`schedule-data.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ScheduleMetadata>,
    pub services: Vec<ServiceRecord>,
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

fn default_heading_level() -> u8 {
    2
}

/// `null` reads as the default heading level.
fn heading_level<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(d)?.unwrap_or_else(default_heading_level))
}

/// `null` reads as an empty string.
fn string_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// One block of article body content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading {
        #[serde(default = "default_heading_level", deserialize_with = "heading_level")]
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Image {
        #[serde(alias = "url", alias = "image", alias = "path")]
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    List {
        items: Vec<String>,
    },
}

/// A single news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "string_or_null")]
    pub author: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub category: String,
    /// Display label for `category`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewsItem {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(&self.category)
    }
}

/// The news document (`news-data.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub news: Vec<NewsItem>,
}

// ---------------------------------------------------------------------------
// Backups & notifications
// ---------------------------------------------------------------------------

/// A timestamped full snapshot of a document, kept for manual recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Milliseconds since the epoch at creation, unique within a list.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
    pub description: String,
}

impl Backup {
    /// Number of records in the snapshot, for listings.
    pub fn record_count(&self, kind: DocumentKind) -> usize {
        self.data
            .get(kind.records_field())
            .and_then(|v| v.as_array())
            .map_or(0, |a| a.len())
    }
}

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a notification, drives icon and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "bi-check-circle",
            Self::Error => "bi-exclamation-triangle",
            Self::Warning => "bi-exclamation-circle",
            Self::Info => "bi-info-circle",
        }
    }
}
