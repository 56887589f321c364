// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Persistent application settings.
///
/// `#[serde(default)]` lets a saved blob with missing keys merge over the
/// defaults instead of failing to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Bring today's service into view after the schedule renders.
    pub auto_scroll: bool,
    /// Show transient notifications. When off, notifications are dropped.
    pub notifications: bool,
    /// Verbose logging.
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            notifications: true,
            debug_mode: false,
        }
    }
}

/// Names of the individual settings, as used in the stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    AutoScroll,
    Notifications,
    DebugMode,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoScroll => "autoScroll",
            Self::Notifications => "notifications",
            Self::DebugMode => "debugMode",
        }
    }
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autoScroll" | "auto-scroll" => Ok(Self::AutoScroll),
            "notifications" => Ok(Self::Notifications),
            "debugMode" | "debug-mode" => Ok(Self::DebugMode),
            other => Err(format!("unknown setting: {other}")),
        }
    }
}

impl Settings {
    /// Set one value. Callers persist the whole struct afterwards.
    pub fn update(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::AutoScroll => self.auto_scroll = value,
            SettingKey::Notifications => self.notifications = value,
            SettingKey::DebugMode => self.debug_mode = value,
        }
    }

    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::AutoScroll => self.auto_scroll,
            SettingKey::Notifications => self.notifications,
            SettingKey::DebugMode => self.debug_mode,
        }
    }
}
