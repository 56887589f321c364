// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings persistence.

use kliros_core::config::{SettingKey, Settings};
use kliros_core::error::Result;
use tracing::{debug, warn};

use crate::keys;
use crate::kv::KvStore;

/// Loads and saves the [`Settings`] blob.
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KvStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved settings merged over defaults.
    ///
    /// An unreadable blob is logged and ignored; the next save replaces it.
    pub fn load(&self) -> Settings {
        let raw = match self.store.get(keys::SETTINGS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                return Settings::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "settings blob corrupt, using defaults");
            Settings::default()
        })
    }

    /// Persist the whole structure.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(keys::SETTINGS, &json)?;
        debug!(?settings, "settings saved");
        Ok(())
    }

    /// Change one value and re-serialise everything.
    pub fn update(&self, settings: &mut Settings, key: SettingKey, value: bool) -> Result<()> {
        settings.update(key, value);
        self.save(settings)?;
        debug!(key = key.as_str(), value, "setting updated");
        Ok(())
    }
}
