// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share payloads for services, the whole schedule, and news articles.

use std::str::FromStr;

use reqwest::Url;

use kliros_core::error::{KlirosError, Result};
use kliros_core::types::{NewsItem, ScheduleDocument, ServiceRecord};

pub const SCHEDULE_SHARE_TITLE: &str = "📅 Расписание богослужений";
pub const SERVICE_SHARE_TITLE: &str = "⛪ Богослужение";
const SCHEDULE_SHARE_HEADLINE: &str = "Расписание богослужений Свято-Георгиевского храма";

const TELEGRAM_SHARE: &str = "https://t.me/share/url";
const VK_SHARE: &str = "https://vk.com/share.php";

/// Title, body, and link handed to the share sheet or clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    /// Text placed on the clipboard when no share sheet is available.
    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.text, self.url)
    }
}

/// Multi-line description of a single service.
pub fn service_text(service: &ServiceRecord) -> String {
    let times = service
        .times
        .iter()
        .map(|slot| format!("{} - {}", slot.time, slot.kind))
        .collect::<Vec<_>>()
        .join("\n⏰ ");
    format!(
        "📅 {}\n📍 {} {} ({})\n⏰ {}",
        service.title, service.day_number, service.month, service.weekday, times
    )
}

pub fn service_payload(service: &ServiceRecord, page_url: &str) -> SharePayload {
    SharePayload {
        title: SERVICE_SHARE_TITLE.to_owned(),
        text: service_text(service),
        url: page_url.to_owned(),
    }
}

pub fn schedule_payload(doc: &ScheduleDocument, page_url: &str) -> SharePayload {
    let period = doc
        .metadata
        .as_ref()
        .and_then(|m| m.week_period.as_deref())
        .unwrap_or("");
    SharePayload {
        title: SCHEDULE_SHARE_TITLE.to_owned(),
        text: format!("{SCHEDULE_SHARE_HEADLINE}\n{period}"),
        url: page_url.to_owned(),
    }
}

/// Where a news article is shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Telegram,
    Vk,
    Copy,
}

impl SharePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Vk => "vk",
            Self::Copy => "copy",
        }
    }

    /// Link to open (or copy) for `item` published at `page_url`.
    pub fn share_url(&self, item: &NewsItem, page_url: &str) -> Result<String> {
        let url = match self {
            Self::Telegram => Url::parse_with_params(
                TELEGRAM_SHARE,
                &[("url", page_url), ("text", item.title.as_str())],
            ),
            Self::Vk => Url::parse_with_params(
                VK_SHARE,
                &[
                    ("url", page_url),
                    ("title", item.title.as_str()),
                    ("description", item.description.as_str()),
                ],
            ),
            Self::Copy => return Ok(page_url.to_owned()),
        };
        url.map(String::from)
            .map_err(|e| KlirosError::transport("share link", e))
    }
}

impl FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(Self::Telegram),
            "vk" => Ok(Self::Vk),
            "copy" => Ok(Self::Copy),
            other => Err(format!("unknown share platform: {other}")),
        }
    }
}
