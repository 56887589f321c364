// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `kliros admin …`: the JSON editor driven from the command line.
//
// Each invocation opens a fresh editor. Commands that need "the current
// document" refresh it from the source first (or the saved copy when offline).

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use kliros_core::error::Result;
use kliros_core::types::{DocumentKind, NotificationKind};
use kliros_data::import_file;
use serde_json::Value;
use tracing::{debug, info};

use super::Prompt;
use crate::cli::AdminAction;
use crate::services::app_services::AppServices;

pub async fn run(svc: &AppServices, action: AdminAction, prompt: &Prompt) -> Result<()> {
    let mut editor = svc.editor();
    let now = Utc::now();

    match action {
        AdminAction::Format { file } => {
            editor.set_buffer(std::fs::read_to_string(&file)?);
            editor.format()?;
            std::fs::write(&file, editor.buffer())?;
            status(svc, "JSON formatted", NotificationKind::Success);
        }

        AdminAction::Validate { file } => {
            editor.set_buffer(std::fs::read_to_string(&file)?);
            let doc = editor.validate()?;
            status(
                svc,
                &format!("JSON is valid ({} services)", doc.services.len()),
                NotificationKind::Success,
            );
        }

        AdminAction::Save { file } => {
            let current = current_document(svc).await;
            if let Some(current) = &current {
                editor.load(current)?;
            }
            editor.set_buffer(std::fs::read_to_string(&file)?);
            let saved = editor.save(current.as_ref(), now)?;
            svc.apply_saved(saved);
            notify(svc, NotificationKind::Success, "Saved", "The schedule was updated.");
            status(svc, "Changes saved", NotificationKind::Success);
        }

        AdminAction::Backups => {
            let backups = editor.backups()?;
            if backups.is_empty() {
                println!("No backups yet.");
            }
            for b in backups {
                println!(
                    "{}  {}  ({} services)",
                    b.id,
                    b.description,
                    b.record_count(DocumentKind::Schedule)
                );
            }
        }

        AdminAction::Restore { id, output } => {
            if !editor.restore(id, prompt)? {
                status(svc, "Restore cancelled", NotificationKind::Info);
                return Ok(());
            }
            write_or_print(output.as_deref(), editor.buffer())?;
            status(svc, "Backup restored into the editor; save it to apply", NotificationKind::Info);
        }

        AdminAction::Delete { id } => {
            if editor.delete_backup(id, prompt)? {
                status(svc, "Backup deleted", NotificationKind::Success);
            } else {
                status(svc, "Delete cancelled", NotificationKind::Info);
            }
        }

        AdminAction::Export { dir } => {
            svc.refresh_schedule().await?;
            editor.load(&svc.current_schedule_value()?)?;
            let path = editor.export(&dir, now.date_naive())?;
            status(svc, &format!("Exported to {}", path.display()), NotificationKind::Success);
        }

        AdminAction::ExportBackups { dir } => {
            let path = editor.export_backups(&dir, now.date_naive())?;
            status(svc, &format!("Backups exported to {}", path.display()), NotificationKind::Success);
        }

        AdminAction::Import { file, output } => {
            let value = import_file(&file).await?;
            editor.import(value)?;
            write_or_print(output.as_deref(), editor.buffer())?;
            status(svc, "File loaded; not saved yet", NotificationKind::Info);
        }

        AdminAction::Reset => {
            if !editor.confirm_reset(prompt) {
                status(svc, "Reset cancelled", NotificationKind::Info);
                return Ok(());
            }
            svc.refresh_schedule().await?;
            editor.load(&svc.current_schedule_value()?)?;
            info!("schedule reloaded from source");
            status(svc, "Data reset", NotificationKind::Info);
        }

        AdminAction::DebugDump { dir } => {
            let current = current_document(svc).await;
            let path = editor.debug_dump(&dir, now, current.as_ref(), &svc.settings())?;
            status(svc, &format!("Debug dump written to {}", path.display()), NotificationKind::Success);
        }
    }
    Ok(())
}

/// The schedule as currently shown, if one can be loaded at all.
async fn current_document(svc: &AppServices) -> Option<Value> {
    if let Err(e) = svc.refresh_schedule().await {
        debug!(error = %e, "no current schedule");
        return None;
    }
    svc.current_schedule_value().ok()
}

fn write_or_print(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}

fn notify(svc: &AppServices, kind: NotificationKind, title: &str, message: &str) {
    svc.with_state(|s| s.notifier.push(kind, title, message, Instant::now()));
}

/// Set the admin status line and echo it.
fn status(svc: &AppServices, message: &str, kind: NotificationKind) {
    let now = Instant::now();
    svc.with_state(|s| {
        s.status.set(message, kind, now);
        let (text, _) = s.status.text(now);
        println!("{text}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use kliros_data::{AnySource, DirSource};
    use serde_json::json;

    fn schedule_json(title: &str) -> String {
        json!({
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
        .to_string()
    }

    fn setup(dir: &Path) -> AppServices {
        std::fs::write(dir.join("schedule-data.json"), schedule_json("Из источника")).unwrap();
        AppServices::in_memory(dir.to_path_buf(), AnySource::Dir(DirSource::new(dir))).unwrap()
    }

    #[tokio::test]
    async fn save_backs_up_the_source_document() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = setup(tmp.path());
        let edited = tmp.path().join("edited.json");
        std::fs::write(&edited, schedule_json("Изменённое")).unwrap();

        run(&svc, AdminAction::Save { file: edited }, &Prompt::new(true)).await.unwrap();

        let backups = svc.editor().backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].data["services"][0]["title"], "Из источника");
        let shown = svc.with_state(|s| s.schedule.as_ref().map(|d| d.services[0].title.clone()));
        assert_eq!(shown.as_deref(), Some("Изменённое"));
    }

    #[tokio::test]
    async fn format_rewrites_file() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = setup(tmp.path());
        let file = tmp.path().join("compact.json");
        std::fs::write(&file, r#"{"b":1,"a":2}"#).unwrap();

        run(&svc, AdminAction::Format { file: file.clone() }, &Prompt::new(true)).await.unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "{\n  \"b\": 1,\n  \"a\": 2\n}");
    }

    #[tokio::test]
    async fn import_csv_writes_editable_json() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = setup(tmp.path());
        let csv = tmp.path().join("week.csv");
        std::fs::write(&csv, "h\n2025-05-06,6,мая,Вторник,Служба,,,,\n").unwrap();
        let out = tmp.path().join("out.json");

        run(&svc, AdminAction::Import { file: csv, output: Some(out.clone()) }, &Prompt::new(true))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["services"][0]["id"], "imported-1");
        assert!(svc.editor().backups().unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_names_file_by_date() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = setup(tmp.path());
        let out = tmp.path().join("exports");
        std::fs::create_dir(&out).unwrap();

        run(&svc, AdminAction::Export { dir: out.clone() }, &Prompt::new(true)).await.unwrap();
        let name = format!("schedule-{}.json", Utc::now().date_naive().format("%Y-%m-%d"));
        assert!(out.join(name).exists());
    }

    #[tokio::test]
    async fn export_and_backup_keep_the_document_as_published() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = setup(tmp.path());
        let published = json!({
            "metadata": { "church": "Свято-Георгиевский", "weekPeriod": "5 - 11 мая" },
            "services": [{
                "id": "s1",
                "date": "2025-05-06T00:00:00",
                "dayNumber": 6,
                "month": "мая",
                "weekday": "Вторник",
                "title": "Из источника",
                "special": true,
                "times": [{ "time": "8:00", "type": "Литургия", "icon": "bi bi-sun" }]
            }]
        });
        std::fs::write(tmp.path().join("schedule-data.json"), published.to_string()).unwrap();

        let out = tmp.path().join("exports");
        std::fs::create_dir(&out).unwrap();
        run(&svc, AdminAction::Export { dir: out.clone() }, &Prompt::new(true)).await.unwrap();
        let name = format!("schedule-{}.json", Utc::now().date_naive().format("%Y-%m-%d"));
        let exported: Value =
            serde_json::from_str(&std::fs::read_to_string(out.join(name)).unwrap()).unwrap();
        assert_eq!(exported, published);

        let edited = tmp.path().join("edited.json");
        std::fs::write(&edited, schedule_json("Изменённое")).unwrap();
        run(&svc, AdminAction::Save { file: edited }, &Prompt::new(true)).await.unwrap();
        assert_eq!(svc.editor().backups().unwrap()[0].data, published);
    }
}
