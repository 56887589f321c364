// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! kliros-store — local persistence for the Kliros schedule engine.
//!
//! Everything the site keeps between runs is a JSON string under a fixed key:
//! the settings blob, the last saved schedule, and the rolling backup list.
//! [`KvStore`] abstracts the storage; [`SqliteStore`] is the on-disk
//! implementation and [`MemoryStore`] backs tests and throwaway sessions.

pub mod backups;
pub mod kv;
pub mod settings;
pub mod snapshot;

pub use backups::{BACKUP_CAPACITY, BackupLog};
pub use kv::{KvStore, MemoryStore, SqliteStore};
pub use settings::SettingsStore;
pub use snapshot::SnapshotStore;

/// Storage keys, shared with the browser build of the site.
pub mod keys {
    pub const SETTINGS: &str = "scheduleSettings";
    pub const SCHEDULE_DATA: &str = "scheduleData";
    pub const SCHEDULE_BACKUPS: &str = "scheduleBackups";
}
