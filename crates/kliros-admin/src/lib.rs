// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kliros-admin — the schedule administration panel.
//
// A JSON editor buffer with save/backup/restore semantics, the panel
// visibility state machine with its keyboard and mouse triggers, and the
// transient notification queue shared with the public pages.

pub mod editor;
pub mod notify;
pub mod panel;

pub use editor::{Confirm, Editor, export_file_name};
pub use notify::{Notification, Notifier, StatusLine};
pub use panel::{Command, KeyEvent, Panel, PanelState, SecretSequence, TripleClick};
