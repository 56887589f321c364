// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command dispatch.

pub mod admin;
pub mod view;
pub mod watch;

use kliros_admin::{Confirm, Notification};
use kliros_core::error::Result;
use tracing::warn;

use crate::cli::Command;
use crate::services::app_services::AppServices;

/// Terminal confirmation prompt. `--yes` skips it.
pub struct Prompt {
    assume_yes: bool,
}

impl Prompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "no terminal for confirmation, treating as no");
                false
            })
    }
}

pub async fn run(command: Command, svc: &AppServices, prompt: &Prompt) -> Result<()> {
    match command {
        Command::Schedule { today, share, service } => {
            view::schedule(svc, today, share.as_deref(), service.as_deref()).await
        }
        Command::News(args) => view::news(svc, &args).await,
        Command::Article { key, share, page_url, html } => {
            view::article(svc, &key, share, &page_url, html).await
        }
        Command::Settings { action } => view::settings(svc, action),
        Command::Admin { action } => admin::run(svc, action, prompt).await,
        Command::Watch => watch::run(svc).await,
    }
}

/// One line per notification, for stderr.
pub fn format_notification(n: &Notification) -> String {
    format!("[{}] {}: {}", kind_label(n), n.title, n.message)
}

fn kind_label(n: &Notification) -> &'static str {
    use kliros_core::types::NotificationKind::*;
    match n.kind {
        Success => "ok",
        Error => "error",
        Warning => "warning",
        Info => "info",
    }
}

/// Print whatever is still queued.
pub fn print_notifications(svc: &AppServices) {
    svc.with_state(|s| {
        for n in s.notifier.active() {
            eprintln!("{}", format_notification(n));
        }
    });
}
