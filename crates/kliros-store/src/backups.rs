// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rolling backup list, newest first, capped at `BACKUP_CAPACITY`.
//
// The list is bounded by insertion, not access: every push goes to the head
// and the tail is truncated. Restoring a backup does not move it.

use chrono::{DateTime, Local, Utc};
use kliros_core::error::{KlirosError, Result};
use kliros_core::types::Backup;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::keys;
use crate::kv::KvStore;

/// Maximum number of backups kept.
pub const BACKUP_CAPACITY: usize = 10;

/// Backup list persisted as one JSON array under a single key.
pub struct BackupLog<S> {
    store: S,
    key: &'static str,
    capacity: usize,
}

impl<S: KvStore> BackupLog<S> {
    /// The schedule backup list.
    pub fn schedule(store: S) -> Self {
        Self {
            store,
            key: keys::SCHEDULE_BACKUPS,
            capacity: BACKUP_CAPACITY,
        }
    }

    /// All backups, newest first. A missing key is an empty list.
    pub fn list(&self) -> Result<Vec<Backup>> {
        match self.store.get(self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Snapshot `data` at the head of the list and evict past capacity.
    #[instrument(skip(self, data))]
    pub fn push(&self, data: Value, now: DateTime<Utc>) -> Result<Backup> {
        let mut backups = self.list()?;

        let mut id = now.timestamp_millis();
        if let Some(head) = backups.first()
            && head.id >= id
        {
            id = head.id + 1;
        }

        let backup = Backup {
            id,
            timestamp: now,
            data,
            description: describe(now),
        };
        backups.insert(0, backup.clone());

        if backups.len() > self.capacity {
            let evicted = backups.len() - self.capacity;
            backups.truncate(self.capacity);
            debug!(evicted, "oldest backups evicted");
        }

        self.write(&backups)?;
        info!(id = backup.id, "backup created");
        Ok(backup)
    }

    /// Look up one backup by id.
    pub fn find(&self, id: i64) -> Result<Backup> {
        self.list()?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or(KlirosError::BackupNotFound(id))
    }

    /// Delete one backup. Errors if it doesn't exist.
    #[instrument(skip(self))]
    pub fn remove(&self, id: i64) -> Result<()> {
        let mut backups = self.list()?;
        let before = backups.len();
        backups.retain(|b| b.id != id);
        if backups.len() == before {
            return Err(KlirosError::BackupNotFound(id));
        }
        self.write(&backups)?;
        info!("backup deleted");
        Ok(())
    }

    /// The raw list as pretty JSON, for exporting.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list()?)?)
    }

    fn write(&self, backups: &[Backup]) -> Result<()> {
        let json = serde_json::to_string(backups)?;
        self.store.set(self.key, &json)
    }
}

/// Human-readable description in the site's locale.
fn describe(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&Local);
    format!("Резервная копия от {}", local.format("%d.%m.%Y, %H:%M:%S"))
}
