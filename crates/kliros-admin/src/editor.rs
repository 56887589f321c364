// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Admin JSON editor.
//
// The editor holds free text. Nothing reaches storage until `save`, which
// validates first, writes the snapshot, then records the previously loaded
// document in the backup list. A failed operation leaves the buffer, the
// backups and the stored document as they were.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use kliros_core::config::Settings;
use kliros_core::error::Result;
use kliros_core::types::{Backup, ScheduleDocument};
use kliros_data::loader::{Validated, schedule_from_value};
use kliros_store::{BackupLog, KvStore, SnapshotStore};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

/// Asks the user before a destructive step.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub const RESTORE_PROMPT: &str = "Replace the editor contents with this backup?";
pub const DELETE_PROMPT: &str = "Delete this backup?";
pub const RESET_PROMPT: &str = "Discard all changes and reload the schedule from the source?";

/// `<prefix>-YYYY-MM-DD.json`
pub fn export_file_name(prefix: &str, day: NaiveDate) -> String {
    format!("{prefix}-{}.json", day.format("%Y-%m-%d"))
}

pub struct Editor<S> {
    buffer: String,
    /// Document the buffer was last loaded from.
    original: Option<Value>,
    backups: BackupLog<S>,
    snapshot: SnapshotStore<S>,
}

impl<S: KvStore + Clone> Editor<S> {
    pub fn new(store: S) -> Self {
        Self {
            buffer: String::new(),
            original: None,
            backups: BackupLog::schedule(store.clone()),
            snapshot: SnapshotStore::new(store),
        }
    }

    /// Show `doc` in the editor and remember it as the backup source.
    pub fn load(&mut self, doc: &Value) -> Result<()> {
        self.buffer = serde_json::to_string_pretty(doc)?;
        self.original = Some(doc.clone());
        debug!("document loaded into editor");
        Ok(())
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Re-indent the buffer with two spaces. Key order is kept.
    pub fn format(&mut self) -> Result<()> {
        let value: Value = serde_json::from_str(&self.buffer)?;
        self.buffer = serde_json::to_string_pretty(&value)?;
        Ok(())
    }

    /// Check the buffer without changing anything.
    pub fn validate(&self) -> Result<ScheduleDocument> {
        let value: Value = serde_json::from_str(&self.buffer)?;
        schedule_from_value(value)
    }

    /// Validate, persist the buffer, and back up the previous document.
    ///
    /// The backup holds the document the editor was loaded from, or `current`
    /// when nothing was loaded. With neither, no backup is made. If the backup
    /// cannot be written the stored snapshot is rolled back, so a failed save
    /// leaves storage as it was.
    #[instrument(skip_all)]
    pub fn save(
        &mut self,
        current: Option<&Value>,
        now: DateTime<Utc>,
    ) -> Result<Validated<ScheduleDocument>> {
        let value: Value = serde_json::from_str(&self.buffer)?;
        let doc = schedule_from_value(value.clone())?;

        let stored = match self.snapshot.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "stored snapshot unreadable; rollback will clear it");
                None
            }
        };
        self.snapshot.save(&value)?;

        if let Some(previous) = self.original.as_ref().or(current)
            && let Err(e) = self.backups.push(previous.clone(), now)
        {
            let rollback = match &stored {
                Some(stored) => self.snapshot.save(stored),
                None => self.snapshot.clear(),
            };
            if let Err(rb) = rollback {
                warn!(error = %rb, "snapshot rollback failed");
            }
            return Err(e);
        }
        self.original = Some(value.clone());

        info!(services = doc.services.len(), "schedule saved");
        Ok(Validated { doc, raw: value })
    }

    pub fn backups(&self) -> Result<Vec<Backup>> {
        self.backups.list()
    }

    /// Put a backup's snapshot into the buffer. Returns `false` when the user
    /// declines; the buffer is then untouched.
    #[instrument(skip(self, confirm))]
    pub fn restore(&mut self, id: i64, confirm: &impl Confirm) -> Result<bool> {
        let backup = self.backups.find(id)?;
        if !confirm.confirm(RESTORE_PROMPT) {
            debug!("restore declined");
            return Ok(false);
        }
        self.buffer = serde_json::to_string_pretty(&backup.data)?;
        info!("backup restored into editor");
        Ok(true)
    }

    /// Remove one backup after confirmation.
    #[instrument(skip(self, confirm))]
    pub fn delete_backup(&self, id: i64, confirm: &impl Confirm) -> Result<bool> {
        self.backups.find(id)?;
        if !confirm.confirm(DELETE_PROMPT) {
            debug!("delete declined");
            return Ok(false);
        }
        self.backups.remove(id)?;
        Ok(true)
    }

    /// Replace the buffer with imported data. Not saved until [`Editor::save`].
    pub fn import(&mut self, value: Value) -> Result<()> {
        self.load(&value)
    }

    /// Ask whether to drop all edits. The caller reloads from the source and
    /// calls [`Editor::load`] when this returns `true`.
    pub fn confirm_reset(&mut self, confirm: &impl Confirm) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            return false;
        }
        self.buffer.clear();
        self.original = None;
        info!("editor reset");
        true
    }

    /// Write the buffer, pretty-printed, to `dir/schedule-YYYY-MM-DD.json`.
    pub fn export(&self, dir: &Path, day: NaiveDate) -> Result<PathBuf> {
        let value: Value = serde_json::from_str(&self.buffer)?;
        write_json(dir, &export_file_name("schedule", day), &value)
    }

    /// Write every backup to `dir/schedule-backups-YYYY-MM-DD.json`.
    pub fn export_backups(&self, dir: &Path, day: NaiveDate) -> Result<PathBuf> {
        let path = dir.join(export_file_name("schedule-backups", day));
        std::fs::write(&path, self.backups.export_json()?)?;
        info!(path = %path.display(), "backups exported");
        Ok(path)
    }

    /// Diagnostic dump of the current document, settings, and backups.
    pub fn debug_dump(
        &self,
        dir: &Path,
        now: DateTime<Utc>,
        current: Option<&Value>,
        settings: &Settings,
    ) -> Result<PathBuf> {
        let dump = json!({
            "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "scheduleData": current,
            "settings": settings,
            "backups": self.backups.list()?,
        });
        write_json(dir, &export_file_name("schedule-debug", now.date_naive()), &dump)
    }
}

fn write_json(dir: &Path, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
    info!(path = %path.display(), "exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kliros_core::error::KlirosError;
    use kliros_store::{MemoryStore, keys};
    use std::sync::Arc;

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_746_500_000 + secs, 0).unwrap()
    }

    fn schedule(title: &str) -> Value {
        json!({
            "metadata": { "weekPeriod": "5 - 11 мая", "version": "1.0" },
            "services": [{
                "id": "s1",
                "date": "2025-05-06",
                "dayNumber": 6,
                "month": "мая",
                "weekday": "Вторник",
                "title": title,
                "times": [{ "time": "8:00", "type": "Литургия" }]
            }]
        })
    }

    /// Memory store that rejects writes to one key.
    struct FailingStore {
        inner: MemoryStore,
        fail_key: &'static str,
    }

    impl FailingStore {
        fn new(fail_key: &'static str) -> Arc<Self> {
            Arc::new(Self { inner: MemoryStore::new(), fail_key })
        }
    }

    impl KvStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == self.fail_key {
                return Err(KlirosError::Storage("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn editor() -> (Editor<Arc<MemoryStore>>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Editor::new(Arc::clone(&store)), store)
    }

    #[test]
    fn format_uses_two_spaces_and_keeps_key_order() {
        let (mut ed, _) = editor();
        ed.set_buffer(r#"{"z":1,"a":{"b":[1,2]}}"#);
        ed.format().unwrap();
        assert_eq!(ed.buffer(), "{\n  \"z\": 1,\n  \"a\": {\n    \"b\": [\n      1,\n      2\n    ]\n  }\n}");
    }

    #[test]
    fn format_leaves_broken_buffer_alone() {
        let (mut ed, _) = editor();
        ed.set_buffer("{ not json");
        assert!(matches!(ed.format(), Err(KlirosError::Serialization(_))));
        assert_eq!(ed.buffer(), "{ not json");
    }

    #[test]
    fn save_backs_up_loaded_document() {
        let (mut ed, store) = editor();
        ed.load(&schedule("Старое")).unwrap();
        ed.set_buffer(schedule("Новое").to_string());

        let saved = ed.save(None, at(0)).unwrap();
        assert_eq!(saved.doc.services[0].title, "Новое");
        assert_eq!(saved.raw, schedule("Новое"));

        let backups = ed.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].data, schedule("Старое"));

        let saved = SnapshotStore::new(store).load().unwrap();
        assert_eq!(saved, Some(schedule("Новое")));
    }

    #[test]
    fn save_falls_back_to_current_document() {
        let (mut ed, _) = editor();
        ed.set_buffer(schedule("Новое").to_string());
        ed.save(Some(&schedule("В памяти")), at(0)).unwrap();
        assert_eq!(ed.backups().unwrap()[0].data, schedule("В памяти"));
    }

    #[test]
    fn invalid_save_changes_nothing() {
        let (mut ed, store) = editor();
        ed.load(&schedule("Старое")).unwrap();
        let mut broken = schedule("x");
        broken["services"][0]
            .as_object_mut()
            .unwrap()
            .remove("title");
        ed.set_buffer(broken.to_string());

        let err = ed.save(None, at(0)).unwrap_err();
        assert!(matches!(err, KlirosError::Validation(ref v) if v.field == "title" && v.record == Some(1)));
        assert!(ed.backups().unwrap().is_empty());
        assert_eq!(SnapshotStore::new(store).load().unwrap(), None);
        assert_eq!(ed.buffer(), broken.to_string());
    }

    #[test]
    fn failed_snapshot_write_leaves_no_backup() {
        let store = FailingStore::new(keys::SCHEDULE_DATA);
        let mut ed = Editor::new(Arc::clone(&store));
        ed.load(&schedule("Старое")).unwrap();
        ed.set_buffer(schedule("Новое").to_string());

        assert!(matches!(ed.save(None, at(0)), Err(KlirosError::Storage(_))));
        assert!(ed.backups().unwrap().is_empty());
        assert_eq!(SnapshotStore::new(Arc::clone(&store)).load().unwrap(), None);
        assert_eq!(ed.buffer(), schedule("Новое").to_string());
        assert_eq!(ed.original, Some(schedule("Старое")));
    }

    #[test]
    fn failed_backup_write_restores_previous_snapshot() {
        let store = FailingStore::new(keys::SCHEDULE_BACKUPS);
        let snapshots = SnapshotStore::new(Arc::clone(&store));
        snapshots.save(&schedule("Сохранённое")).unwrap();

        let mut ed = Editor::new(Arc::clone(&store));
        ed.load(&schedule("Старое")).unwrap();
        ed.set_buffer(schedule("Новое").to_string());

        assert!(matches!(ed.save(None, at(0)), Err(KlirosError::Storage(_))));
        assert_eq!(snapshots.load().unwrap(), Some(schedule("Сохранённое")));
        assert!(ed.backups().unwrap().is_empty());
        assert_eq!(ed.original, Some(schedule("Старое")));
    }

    #[test]
    fn failed_first_backup_clears_new_snapshot() {
        let store = FailingStore::new(keys::SCHEDULE_BACKUPS);
        let mut ed = Editor::new(Arc::clone(&store));
        ed.set_buffer(schedule("Новое").to_string());

        let err = ed.save(Some(&schedule("В памяти")), at(0)).unwrap_err();
        assert!(matches!(err, KlirosError::Storage(_)));
        assert_eq!(SnapshotStore::new(Arc::clone(&store)).load().unwrap(), None);
        assert_eq!(ed.original, None);
    }

    #[test]
    fn declined_restore_and_delete_change_nothing() {
        let (mut ed, _) = editor();
        ed.load(&schedule("Первое")).unwrap();
        ed.set_buffer(schedule("Второе").to_string());
        ed.save(None, at(0)).unwrap();
        let id = ed.backups().unwrap()[0].id;
        let before = ed.buffer().to_owned();

        assert!(!ed.restore(id, &no).unwrap());
        assert_eq!(ed.buffer(), before);

        assert!(!ed.delete_backup(id, &no).unwrap());
        assert_eq!(ed.backups().unwrap().len(), 1);
    }

    #[test]
    fn confirmed_restore_and_delete() {
        let (mut ed, _) = editor();
        ed.load(&schedule("Первое")).unwrap();
        ed.set_buffer(schedule("Второе").to_string());
        ed.save(None, at(0)).unwrap();
        let id = ed.backups().unwrap()[0].id;

        assert!(ed.restore(id, &yes).unwrap());
        assert_eq!(ed.validate().unwrap().services[0].title, "Первое");

        assert!(ed.delete_backup(id, &yes).unwrap());
        assert!(ed.backups().unwrap().is_empty());
        assert!(matches!(ed.restore(id, &yes), Err(KlirosError::BackupNotFound(_))));
    }

    #[test]
    fn declined_reset_keeps_buffer() {
        let (mut ed, _) = editor();
        ed.load(&schedule("Первое")).unwrap();
        assert!(!ed.confirm_reset(&no));
        assert!(!ed.buffer().is_empty());
        assert!(ed.confirm_reset(&yes));
        assert!(ed.buffer().is_empty());
    }

    #[test]
    fn export_format_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ed, _) = editor();
        let doc = schedule("Литургия");
        ed.load(&doc).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let path = ed.export(dir.path(), day).unwrap();
        assert_eq!(path.file_name().unwrap(), "schedule-2025-05-06.json");

        let (mut other, _) = editor();
        other.set_buffer(std::fs::read_to_string(&path).unwrap());
        other.format().unwrap();
        let reparsed: Value = serde_json::from_str(other.buffer()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn backup_and_debug_exports() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ed, _) = editor();
        ed.load(&schedule("Первое")).unwrap();
        ed.save(None, at(0)).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let backups = ed.export_backups(dir.path(), day).unwrap();
        let list: Vec<Backup> =
            serde_json::from_str(&std::fs::read_to_string(backups).unwrap()).unwrap();
        assert_eq!(list.len(), 1);

        let dump = ed
            .debug_dump(dir.path(), at(0), Some(&schedule("Первое")), &Settings::default())
            .unwrap();
        let dump: Value = serde_json::from_str(&std::fs::read_to_string(dump).unwrap()).unwrap();
        assert_eq!(dump["settings"]["autoScroll"], true);
        assert_eq!(dump["backups"].as_array().unwrap().len(), 1);
        assert_eq!(dump["scheduleData"]["services"][0]["title"], "Первое");
    }
}
