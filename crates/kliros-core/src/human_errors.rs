// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for parish volunteers editing the schedule.
//
// Every technical error is mapped to a short title and a plain message that
// the notification reporter shows as-is. Nothing here is fatal: each failure
// is recoverable by retrying the action that caused it.

use crate::error::{KlirosError, Violation};
use crate::types::NotificationKind;

/// A user-facing rendition of an error.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short heading.
    pub title: String,
    /// What happened and what to try.
    pub message: String,
    /// Whether simply trying again is likely to help.
    pub retriable: bool,
    /// Drives icon/colour.
    pub kind: NotificationKind,
}

/// Convert a `KlirosError` into a `HumanError`.
pub fn humanize_error(err: &KlirosError) -> HumanError {
    match err {
        KlirosError::Transport { resource, detail } => {
            let lower = detail.to_ascii_lowercase();
            let message = if lower.starts_with("http 404") {
                format!("{resource} was not found on the server.")
            } else if lower.starts_with("http ") {
                format!("The server answered with an error ({detail}). Try again in a moment.")
            } else if lower.contains("timed out") {
                "The server took too long to answer. Check the connection and try again.".into()
            } else if lower.contains("json") || lower.contains("expected") {
                format!("{resource} is not valid JSON ({detail}).")
            } else {
                format!("Could not load {resource}: {detail}")
            };
            HumanError {
                title: "Loading failed".into(),
                message,
                retriable: true,
                kind: NotificationKind::Error,
            }
        }

        KlirosError::Validation(v) => HumanError {
            title: match v.violation {
                Violation::Missing => "Missing field".into(),
                _ => "Invalid data".into(),
            },
            message: capitalize(&v.to_string()),
            retriable: false,
            kind: NotificationKind::Error,
        },

        KlirosError::UnsupportedFormat(ext) => HumanError {
            title: "Unsupported file".into(),
            message: format!("Files of type '{ext}' can't be imported. Use a .json or .csv file."),
            retriable: false,
            kind: NotificationKind::Warning,
        },

        KlirosError::BackupNotFound(id) => HumanError {
            title: "Backup not found".into(),
            message: format!("Backup {id} no longer exists. It may have been deleted or rotated out."),
            retriable: false,
            kind: NotificationKind::Error,
        },

        KlirosError::NoDocument(kind) => HumanError {
            title: "Nothing loaded".into(),
            message: format!("The {kind} hasn't been loaded yet. Refresh and try again."),
            retriable: true,
            kind: NotificationKind::Warning,
        },

        KlirosError::NewsNotFound(id) => HumanError {
            title: "Article not found".into(),
            message: format!("There is no news item called '{id}'."),
            retriable: false,
            kind: NotificationKind::Warning,
        },

        KlirosError::ServiceNotFound(id) => HumanError {
            title: "Service not found".into(),
            message: format!("There is no service with id '{id}' in the schedule."),
            retriable: false,
            kind: NotificationKind::Warning,
        },

        KlirosError::Storage(_) => HumanError {
            title: "Storage problem".into(),
            message: "Local storage couldn't be read or written. Your last saved data is unchanged.".into(),
            retriable: true,
            kind: NotificationKind::Error,
        },

        KlirosError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    title: "File not found".into(),
                    message: "The file couldn't be found. Check the path and try again.".into(),
                    retriable: false,
                    kind: NotificationKind::Error,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    title: "Permission denied".into(),
                    message: "The file couldn't be opened. Check its permissions.".into(),
                    retriable: false,
                    kind: NotificationKind::Error,
                }
            } else {
                HumanError {
                    title: "File problem".into(),
                    message: "There was a problem reading or writing a file. Try again.".into(),
                    retriable: true,
                    kind: NotificationKind::Error,
                }
            }
        }

        KlirosError::Serialization(e) => HumanError {
            title: "JSON error".into(),
            message: format!("The text is not valid JSON: {e}"),
            retriable: false,
            kind: NotificationKind::Error,
        },
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
