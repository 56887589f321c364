// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state shared by the commands and the background timers.

use kliros_admin::{Notifier, Panel, StatusLine};
use kliros_core::config::Settings;
use kliros_core::types::{NewsDocument, ScheduleDocument};
use kliros_data::NewsQuery;
use serde_json::Value;

/// Everything the running application knows. Owned by
/// [`AppServices`](crate::services::app_services::AppServices) behind a mutex.
#[derive(Debug)]
pub struct AppState {
    /// Last schedule applied by the loader (or restored from the snapshot).
    pub schedule: Option<ScheduleDocument>,
    /// The same schedule as received, unmodelled keys included. Exports and
    /// backups are taken from this.
    pub schedule_raw: Option<Value>,
    /// Last news feed applied by the loader.
    pub news: Option<NewsDocument>,
    /// `true` while the schedule comes from the local snapshot.
    pub offline: bool,
    pub settings: Settings,
    /// Feed filter, search, sort and page.
    pub news_query: NewsQuery,
    pub panel: Panel,
    pub notifier: Notifier,
    pub status: StatusLine,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            schedule: None,
            schedule_raw: None,
            news: None,
            offline: false,
            settings,
            news_query: NewsQuery::new(),
            panel: Panel::new(),
            notifier: Notifier::new(settings.notifications),
            status: StatusLine::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
