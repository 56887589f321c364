// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: opens storage, loads documents, and owns the shared
// `AppState`.
//
// The SQLite connection lives behind its own mutex inside `SqliteStore`; the
// application state has a separate `std::sync::Mutex`. Neither is held across
// an `.await`: loads complete first, then the state is locked to apply them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use kliros_admin::Editor;
use kliros_core::config::{SettingKey, Settings};
use kliros_core::error::{KlirosError, Result};
use kliros_core::types::{DocumentKind, NotificationKind, ScheduleDocument};
use kliros_data::loader::{Validated, schedule_from_value};
use kliros_data::{AnySource, Loaded, Loader};
use kliros_store::{SettingsStore, SnapshotStore, SqliteStore};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::state::AppState;

const DB_FILE: &str = "kliros.db";

/// How a schedule refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refreshed {
    /// Fresh data from the source was applied.
    Live,
    /// The source failed; the locally saved copy is shown instead.
    Offline,
    /// A newer refresh overtook this one; nothing changed.
    Superseded,
}

/// Shared application services. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<SqliteStore>,
    source: Arc<AnySource>,
    schedule_loader: Arc<Loader>,
    news_loader: Arc<Loader>,
    state: Arc<Mutex<AppState>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Open the on-disk store under `data_dir`.
    pub fn open(data_dir: PathBuf, source: AnySource) -> Result<Self> {
        let store = SqliteStore::open(data_dir.join(DB_FILE))?;
        info!(path = %data_dir.display(), "app services initialised");
        Ok(Self::with_store(store, source, data_dir))
    }

    /// In-memory storage, used when the data directory is unusable.
    pub fn in_memory(data_dir: PathBuf, source: AnySource) -> Result<Self> {
        let store = SqliteStore::open_in_memory()?;
        warn!("using in-memory storage, nothing will be kept");
        Ok(Self::with_store(store, source, data_dir))
    }

    fn with_store(store: SqliteStore, source: AnySource, data_dir: PathBuf) -> Self {
        let store = Arc::new(store);
        let settings = SettingsStore::new(Arc::clone(&store)).load();
        Self {
            store,
            source: Arc::new(source),
            schedule_loader: Arc::new(Loader::new()),
            news_loader: Arc::new(Loader::new()),
            state: Arc::new(Mutex::new(AppState::new(settings))),
            data_dir,
        }
    }

    /// Run `f` with the state locked.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Settings ------------------------------------------------------------

    pub fn settings(&self) -> Settings {
        self.with_state(|s| s.settings)
    }

    /// Change one setting and persist the whole blob.
    pub fn update_setting(&self, key: SettingKey, value: bool) -> Result<Settings> {
        let store = SettingsStore::new(Arc::clone(&self.store));
        self.with_state(|s| -> Result<Settings> {
            store.update(&mut s.settings, key, value)?;
            if key == SettingKey::Notifications {
                s.notifier.set_enabled(value);
            }
            Ok(s.settings)
        })
    }

    // -- Loading -------------------------------------------------------------

    /// Fetch the schedule and apply it, falling back to the saved copy when
    /// the source can't be reached.
    pub async fn refresh_schedule(&self) -> Result<Refreshed> {
        match self.schedule_loader.load_schedule(self.source.as_ref()).await {
            Ok(Loaded::Fresh(loaded)) => {
                self.with_state(|s| {
                    s.schedule = Some(loaded.doc);
                    s.schedule_raw = Some(loaded.raw);
                    s.offline = false;
                });
                Ok(Refreshed::Live)
            }
            Ok(Loaded::Superseded) => Ok(Refreshed::Superseded),
            Err(err @ KlirosError::Transport { .. }) => self.fall_back_to_snapshot(err),
            Err(err) => Err(err),
        }
    }

    fn fall_back_to_snapshot(&self, err: KlirosError) -> Result<Refreshed> {
        let saved = match SnapshotStore::new(Arc::clone(&self.store)).load() {
            Ok(Some(saved)) => saved,
            Ok(None) => return Err(err),
            Err(e) => {
                warn!(error = %e, "saved schedule unreadable");
                return Err(err);
            }
        };
        let doc = match schedule_from_value(saved.clone()) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "saved schedule invalid");
                return Err(err);
            }
        };

        warn!(error = %err, "schedule source unavailable, showing saved copy");
        self.with_state(|s| {
            s.schedule = Some(doc);
            s.schedule_raw = Some(saved);
            s.offline = true;
            s.notifier.push(
                NotificationKind::Warning,
                "Offline",
                "The schedule could not be loaded. Showing the last saved copy.",
                Instant::now(),
            );
        });
        Ok(Refreshed::Offline)
    }

    /// Fetch and apply the news feed. `false` when superseded.
    pub async fn refresh_news(&self) -> Result<bool> {
        match self.news_loader.load_news(self.source.as_ref()).await {
            Ok(Loaded::Fresh(doc)) => {
                debug!(items = doc.news.len(), "news applied");
                self.with_state(|s| s.news = Some(doc));
                Ok(true)
            }
            Ok(Loaded::Superseded) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Queue a notification for `err`. Returns `false` when notifications
    /// are switched off.
    pub fn report(&self, err: &KlirosError) -> bool {
        self.with_state(|s| s.notifier.report_error(err, Instant::now()).is_some())
    }

    // -- Admin ---------------------------------------------------------------

    /// The schedule currently shown, exactly as it was received or saved.
    pub fn current_schedule_value(&self) -> Result<Value> {
        self.with_state(|s| s.schedule_raw.clone())
            .ok_or_else(|| KlirosError::NoDocument(DocumentKind::Schedule.label()))
    }

    /// A fresh editor over this application's storage.
    pub fn editor(&self) -> Editor<Arc<SqliteStore>> {
        Editor::new(Arc::clone(&self.store))
    }

    /// Apply a document saved from the editor without refetching.
    pub fn apply_saved(&self, saved: Validated<ScheduleDocument>) {
        self.with_state(|s| {
            s.schedule = Some(saved.doc);
            s.schedule_raw = Some(saved.raw);
            s.offline = false;
        });
    }
}
