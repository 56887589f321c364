// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transient notifications and the admin status line.
//
// Both are driven by explicit `Instant`s so that expiry can be checked from a
// timer tick or a test without sleeping.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use kliros_core::error::KlirosError;
use kliros_core::human_errors::humanize_error;
use kliros_core::types::{NotificationId, NotificationKind};
use tracing::{debug, warn};

/// How long a notification stays up.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// News share confirmations are a little shorter.
pub const NEWS_NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// How long the status line keeps a message before going back to "ready".
pub const STATUS_TTL: Duration = Duration::from_secs(5);

pub const STATUS_READY: &str = "Ready";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub expires_at: Instant,
}

/// Insertion-ordered queue of live notifications.
#[derive(Debug)]
pub struct Notifier {
    enabled: bool,
    queue: VecDeque<Notification>,
}

impl Notifier {
    /// `enabled` mirrors the `notifications` setting.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            queue: VecDeque::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Queue a notification with the default lifetime. Returns `None` when
    /// notifications are switched off.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: Instant,
    ) -> Option<NotificationId> {
        self.push_for(kind, title, message, now, NOTIFICATION_TTL)
    }

    pub fn push_for(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: Instant,
        ttl: Duration,
    ) -> Option<NotificationId> {
        if !self.enabled {
            return None;
        }
        let notification = Notification {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            message: message.into(),
            expires_at: now + ttl,
        };
        debug!(id = %notification.id, ?kind, title = %notification.title, "notification");
        let id = notification.id;
        self.queue.push_back(notification);
        Some(id)
    }

    /// Log `err` and show its plain-language rendition.
    pub fn report_error(&mut self, err: &KlirosError, now: Instant) -> Option<NotificationId> {
        warn!(error = %err, "operation failed");
        let human = humanize_error(err);
        self.push(human.kind, human.title, human.message, now)
    }

    /// Remove one notification early. `false` if it had already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    /// Drop everything expired at `now` and return what was dropped.
    pub fn sweep(&mut self, now: Instant) -> Vec<Notification> {
        let (expired, live): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|n| n.expires_at <= now);
        self.queue = live.into();
        expired
    }

    /// Live notifications, oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// One-line status under the admin editor.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<(String, NotificationKind, Instant)>,
}

impl StatusLine {
    pub fn set(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.current = Some((message.into(), kind, now));
    }

    /// The message to show at `now`.
    pub fn text(&self, now: Instant) -> (&str, NotificationKind) {
        match &self.current {
            Some((message, kind, at)) if now.saturating_duration_since(*at) < STATUS_TTL => {
                (message.as_str(), *kind)
            }
            _ => (STATUS_READY, NotificationKind::Info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_expire_in_order() {
        let t0 = Instant::now();
        let mut n = Notifier::new(true);
        let a = n.push(NotificationKind::Info, "a", "first", t0).unwrap();
        let b = n
            .push_for(NotificationKind::Success, "b", "second", t0, NEWS_NOTIFICATION_TTL)
            .unwrap();
        let c = n.push(NotificationKind::Info, "c", "third", t0 + Duration::from_secs(1)).unwrap();

        let ids: Vec<_> = n.active().map(|x| x.id).collect();
        assert_eq!(ids, [a, b, c]);

        let gone = n.sweep(t0 + Duration::from_secs(4));
        assert_eq!(gone.iter().map(|x| x.id).collect::<Vec<_>>(), [b]);

        let gone = n.sweep(t0 + Duration::from_secs(5));
        assert_eq!(gone.iter().map(|x| x.id).collect::<Vec<_>>(), [a]);

        assert_eq!(n.active().map(|x| x.id).collect::<Vec<_>>(), [c]);
    }

    #[test]
    fn dismiss_before_expiry() {
        let t0 = Instant::now();
        let mut n = Notifier::new(true);
        let id = n.push(NotificationKind::Warning, "w", "m", t0).unwrap();
        assert!(n.dismiss(id));
        assert!(!n.dismiss(id));
        assert!(n.is_empty());
    }

    #[test]
    fn disabled_notifier_drops_pushes() {
        let mut n = Notifier::new(false);
        assert!(n.push(NotificationKind::Error, "x", "y", Instant::now()).is_none());
        assert!(n.is_empty());

        n.set_enabled(true);
        assert!(n.push(NotificationKind::Error, "x", "y", Instant::now()).is_some());
    }

    #[test]
    fn errors_are_humanized() {
        let mut n = Notifier::new(true);
        n.report_error(&KlirosError::UnsupportedFormat("xlsx".into()), Instant::now());
        let shown = n.active().next().unwrap();
        assert_eq!(shown.kind, NotificationKind::Warning);
        assert!(shown.message.contains("xlsx"));
    }

    #[test]
    fn status_line_reverts_to_ready() {
        let t0 = Instant::now();
        let mut status = StatusLine::default();
        assert_eq!(status.text(t0), (STATUS_READY, NotificationKind::Info));

        status.set("Saved", NotificationKind::Success, t0);
        assert_eq!(status.text(t0 + Duration::from_secs(4)), ("Saved", NotificationKind::Success));
        assert_eq!(status.text(t0 + Duration::from_secs(5)).0, STATUS_READY);
    }
}
