// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Long-running mode.
//
// Three independent tasks share `AppServices`: the midnight refresh timer, the
// notification expiry sweep, and the stdin reader that feeds the admin panel.
// Each line typed is either a named action or a run of plain keystrokes
// (typing `admin` opens the panel).

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Local;
use kliros_admin::panel::{CLICK_WINDOW, KeyEvent, PanelEvent};
use kliros_admin::Command as PanelCommand;
use kliros_core::error::Result;
use kliros_core::types::NotificationId;
use kliros_data::refresh::{DAILY, until_next_refresh};
use kliros_data::render_schedule;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::format_notification;
use super::view::format_schedule;
use crate::services::app_services::AppServices;

const SWEEP_EVERY: Duration = Duration::from_secs(1);

const HELP: &str =
    "actions: refresh | toggle | minimize | close | overlay | escape | click | quit";

pub async fn run(svc: &AppServices) -> Result<()> {
    refresh_and_show(svc).await;

    let midnight = tokio::spawn(midnight_refresh(svc.clone()));
    let sweeper = tokio::spawn(sweep_notifications(svc.clone()));

    println!("{HELP}");
    let mut shown = HashSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_new_notifications(svc, &mut shown);
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(svc, line.trim()).await {
                    break;
                }
            }
        }
    }

    midnight.abort();
    sweeper.abort();
    Ok(())
}

/// Apply one line of input. `false` to stop.
async fn handle_line(svc: &AppServices, line: &str) -> bool {
    let before = svc.with_state(|s| s.panel.state());
    let now = Instant::now();

    let command = match line {
        "" => None,
        "quit" | "exit" => return false,
        "refresh" => Some(PanelCommand::Refresh),
        "toggle" => svc.with_state(|s| s.panel.handle_key(&KeyEvent::ctrl_shift('A'))),
        "escape" => svc.with_state(|s| s.panel.handle_key(&KeyEvent::escape())),
        "minimize" => {
            svc.with_state(|s| s.panel.apply(PanelEvent::Minimize));
            None
        }
        "close" => {
            svc.with_state(|s| s.panel.apply(PanelEvent::Close));
            None
        }
        "overlay" => {
            svc.with_state(|s| s.panel.apply(PanelEvent::OverlayClick));
            None
        }
        "click" => {
            svc.with_state(|s| s.panel.title_click(now));
            tokio::spawn(settle_title_clicks(svc.clone()));
            None
        }
        keys => svc.with_state(|s| {
            keys.chars()
                .filter_map(|c| s.panel.handle_key(&KeyEvent::char(c)))
                .last()
        }),
    };

    if command == Some(PanelCommand::Refresh) {
        refresh_and_show(svc).await;
    }

    let after = svc.with_state(|s| s.panel.state());
    if after != before {
        println!("admin panel: {}", after.as_str());
    }
    true
}

/// Judge the title clicks once the click window has passed without another.
async fn settle_title_clicks(svc: AppServices) {
    tokio::time::sleep(CLICK_WINDOW).await;
    let opened = svc.with_state(|s| {
        s.panel
            .settle_clicks(Instant::now())
            .map(|_| s.panel.state())
    });
    if let Some(state) = opened {
        println!("admin panel: {}", state.as_str());
    }
}

async fn refresh_and_show(svc: &AppServices) {
    if let Err(e) = svc.refresh_schedule().await {
        if !svc.report(&e) {
            eprintln!("error: {e}");
        }
        return;
    }
    let today = Local::now().date_naive();
    svc.with_state(|s| {
        if let Some(doc) = &s.schedule {
            print!("{}", format_schedule(&render_schedule(doc, today), s.settings.auto_scroll));
        }
    });
}

/// Refresh at 00:00:01 local time, then every 24 hours.
async fn midnight_refresh(svc: AppServices) {
    let wait = until_next_refresh(&Local::now());
    debug!(?wait, "first scheduled refresh");
    let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + wait, DAILY);
    loop {
        ticks.tick().await;
        info!("daily schedule refresh");
        if let Err(e) = svc.refresh_schedule().await {
            warn!(error = %e, "daily refresh failed");
            svc.report(&e);
        }
    }
}

async fn sweep_notifications(svc: AppServices) {
    let mut ticks = tokio::time::interval(SWEEP_EVERY);
    loop {
        ticks.tick().await;
        let expired = svc.with_state(|s| s.notifier.sweep(Instant::now()));
        for n in expired {
            debug!(id = %n.id, "notification expired");
        }
    }
}

fn print_new_notifications(svc: &AppServices, shown: &mut HashSet<NotificationId>) {
    svc.with_state(|s| {
        for n in s.notifier.active() {
            if shown.insert(n.id) {
                eprintln!("{}", format_notification(n));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use kliros_admin::PanelState;
    use kliros_data::{AnySource, DirSource};

    fn services(dir: &std::path::Path) -> AppServices {
        AppServices::in_memory(dir.to_path_buf(), AnySource::Dir(DirSource::new(dir))).unwrap()
    }

    #[tokio::test]
    async fn typed_lines_drive_the_panel() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = services(tmp.path());
        let state = || svc.with_state(|s| s.panel.state());

        assert!(handle_line(&svc, "adm").await);
        assert_eq!(state(), PanelState::Hidden);
        assert!(handle_line(&svc, "in").await);
        assert_eq!(state(), PanelState::Visible);

        handle_line(&svc, "minimize").await;
        assert_eq!(state(), PanelState::Minimized);
        handle_line(&svc, "minimize").await;
        assert_eq!(state(), PanelState::Visible);
        handle_line(&svc, "escape").await;
        assert_eq!(state(), PanelState::Hidden);
        handle_line(&svc, "toggle").await;
        assert_eq!(state(), PanelState::Visible);
        handle_line(&svc, "toggle").await;
        assert_eq!(state(), PanelState::Hidden);

        handle_line(&svc, "toggle").await;
        handle_line(&svc, "minimize").await;
        handle_line(&svc, "overlay").await;
        assert_eq!(state(), PanelState::Hidden);
        handle_line(&svc, "overlay").await;
        assert_eq!(state(), PanelState::Hidden);

        assert!(!handle_line(&svc, "quit").await);
    }

    #[tokio::test]
    async fn title_clicks_open_the_panel_after_the_window() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = services(tmp.path());
        let state = || svc.with_state(|s| s.panel.state());

        for _ in 0..3 {
            handle_line(&svc, "click").await;
        }
        assert_eq!(state(), PanelState::Hidden);
        tokio::time::sleep(CLICK_WINDOW + Duration::from_millis(100)).await;
        assert_eq!(state(), PanelState::Visible);
    }

    #[tokio::test]
    async fn four_title_clicks_do_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = services(tmp.path());

        for _ in 0..4 {
            handle_line(&svc, "click").await;
        }
        tokio::time::sleep(CLICK_WINDOW + Duration::from_millis(100)).await;
        assert_eq!(svc.with_state(|s| s.panel.state()), PanelState::Hidden);
    }
}
