// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Admin panel visibility and the inputs that drive it.
//
//   Hidden ──show──▶ Visible ◀──minimize──▶ Minimized
//     ▲                 │                       │
//     └──close/escape/overlay/shortcut──────────┘
//
// Any other (state, event) pair leaves the state unchanged.

use std::time::{Duration, Instant};

use tracing::debug;

/// Keystrokes that open the panel when typed in order.
pub const SECRET_WORD: &str = "admin";

/// Clicks closer together than this belong to one run. A run is judged once
/// this long has passed since its last click.
pub const CLICK_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible,
    Minimized,
}

impl PanelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Visible => "visible",
            Self::Minimized => "minimized",
        }
    }
}

/// Something the user did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Secret word, triple-click, or the shortcut while hidden.
    Show,
    /// Ctrl+Shift+A.
    Shortcut,
    Minimize,
    Close,
    OverlayClick,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn char(c: char) -> Self {
        Self { key: Key::Char(c), ctrl: false, shift: false }
    }

    pub fn ctrl_shift(c: char) -> Self {
        Self { key: Key::Char(c), ctrl: true, shift: true }
    }

    pub fn escape() -> Self {
        Self { key: Key::Escape, ctrl: false, shift: false }
    }
}

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleAdmin,
    ShowAdmin,
    Refresh,
    Escape,
}

impl Command {
    /// Global shortcuts. Plain characters map to nothing here.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        match event.key {
            Key::Escape => Some(Self::Escape),
            Key::Char(c) if event.ctrl && event.shift => match c.to_ascii_uppercase() {
                'A' => Some(Self::ToggleAdmin),
                'R' => Some(Self::Refresh),
                _ => None,
            },
            Key::Char(_) => None,
        }
    }
}

/// Matches the last `SECRET_WORD.len()` typed characters against the word.
#[derive(Debug, Clone, Default)]
pub struct SecretSequence {
    typed: String,
}

impl SecretSequence {
    /// Feed one character; `true` when the word has just been completed.
    pub fn push(&mut self, c: char) -> bool {
        self.typed.extend(c.to_lowercase());
        let excess = self.typed.chars().count().saturating_sub(SECRET_WORD.chars().count());
        if excess > 0 {
            let cut = self
                .typed
                .char_indices()
                .nth(excess)
                .map_or(self.typed.len(), |(i, _)| i);
            self.typed.drain(..cut);
        }
        if self.typed == SECRET_WORD {
            self.typed.clear();
            return true;
        }
        false
    }
}

/// A run of title clicks. Only a run of exactly three counts; four quick
/// clicks open nothing.
#[derive(Debug, Clone, Default)]
pub struct TripleClick {
    count: u8,
    last: Option<Instant>,
}

impl TripleClick {
    /// Register a click at `now`.
    pub fn click(&mut self, now: Instant) {
        let in_run = self
            .last
            .is_some_and(|last| now.saturating_duration_since(last) < CLICK_WINDOW);
        self.count = if in_run { self.count.saturating_add(1) } else { 1 };
        self.last = Some(now);
    }

    /// Close the run if it has gone quiet. `true` when it had three clicks.
    pub fn settle(&mut self, now: Instant) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        if now.saturating_duration_since(last) < CLICK_WINDOW {
            return false;
        }
        let hit = self.count == 3;
        self.count = 0;
        self.last = None;
        hit
    }
}

/// The panel state machine plus its secret triggers.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    state: PanelState,
    secret: SecretSequence,
    clicks: TripleClick,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Apply one event and return the new state.
    pub fn apply(&mut self, event: PanelEvent) -> PanelState {
        use PanelEvent::*;
        use PanelState::*;

        let next = match (self.state, event) {
            (Hidden, Show | Shortcut) => Visible,
            (Visible, Minimize) => Minimized,
            (Minimized, Minimize) => Visible,
            (Visible | Minimized, Close | OverlayClick | Escape | Shortcut) => Hidden,
            (state, _) => state,
        };
        if next != self.state {
            debug!(from = self.state.as_str(), to = next.as_str(), ?event, "admin panel");
        }
        self.state = next;
        next
    }

    /// Handle a key press. Returns the command for the caller to act on
    /// after the panel has already reacted to it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<Command> {
        if let Some(command) = Command::from_key(event) {
            match command {
                Command::ToggleAdmin => {
                    self.apply(PanelEvent::Shortcut);
                }
                Command::Escape => {
                    self.apply(PanelEvent::Escape);
                }
                Command::ShowAdmin | Command::Refresh => {}
            }
            return Some(command);
        }

        if let Key::Char(c) = event.key
            && self.secret.push(c)
        {
            self.apply(PanelEvent::Show);
            return Some(Command::ShowAdmin);
        }
        None
    }

    /// Record a click on the page title. Nothing happens until
    /// [`Panel::settle_clicks`] runs after the click window.
    pub fn title_click(&mut self, now: Instant) {
        self.clicks.click(now);
    }

    /// Judge the pending run of title clicks.
    pub fn settle_clicks(&mut self, now: Instant) -> Option<Command> {
        if self.clicks.settle(now) {
            self.apply(PanelEvent::Show);
            return Some(Command::ShowAdmin);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(panel: &mut Panel, s: &str) -> Vec<Command> {
        s.chars().filter_map(|c| panel.handle_key(&KeyEvent::char(c))).collect()
    }

    #[test]
    fn transition_table() {
        use PanelEvent::*;
        use PanelState::*;

        let all = [Show, Shortcut, Minimize, Close, OverlayClick, Escape];
        let expected = |from: PanelState, event: PanelEvent| match (from, event) {
            (Hidden, Show | Shortcut) => Visible,
            (Hidden, _) => Hidden,
            (Visible, Minimize) => Minimized,
            (Visible, Show) => Visible,
            (Visible, _) => Hidden,
            (Minimized, Minimize) => Visible,
            (Minimized, Show) => Minimized,
            (Minimized, _) => Hidden,
        };

        for from in [Hidden, Visible, Minimized] {
            for event in all {
                let mut panel = Panel { state: from, ..Panel::default() };
                assert_eq!(panel.apply(event), expected(from, event), "{from:?} + {event:?}");
            }
        }
    }

    #[test]
    fn secret_word_opens_panel() {
        let mut panel = Panel::new();
        assert!(type_str(&mut panel, "xxadmi").is_empty());
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(type_str(&mut panel, "n"), [Command::ShowAdmin]);
        assert_eq!(panel.state(), PanelState::Visible);
    }

    #[test]
    fn secret_word_is_case_insensitive_and_resets() {
        let mut seq = SecretSequence::default();
        let hits: Vec<bool> = "ADMINadmi".chars().map(|c| seq.push(c)).collect();
        assert_eq!(hits.iter().filter(|h| **h).count(), 1);
        assert!(seq.push('n'));
    }

    #[test]
    fn shortcuts() {
        let mut panel = Panel::new();
        assert_eq!(panel.handle_key(&KeyEvent::ctrl_shift('A')), Some(Command::ToggleAdmin));
        assert_eq!(panel.state(), PanelState::Visible);

        panel.apply(PanelEvent::Minimize);
        assert_eq!(panel.state(), PanelState::Minimized);

        assert_eq!(panel.handle_key(&KeyEvent::ctrl_shift('r')), Some(Command::Refresh));
        assert_eq!(panel.state(), PanelState::Minimized);

        assert_eq!(panel.handle_key(&KeyEvent::escape()), Some(Command::Escape));
        assert_eq!(panel.state(), PanelState::Hidden);
    }

    #[test]
    fn three_clicks_count_once_the_run_settles() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        let mut clicks = TripleClick::default();
        clicks.click(t0);
        clicks.click(t0 + ms(400));
        clicks.click(t0 + ms(800));
        assert!(!clicks.settle(t0 + ms(1200)));
        assert!(clicks.settle(t0 + ms(1300)));
        assert!(!clicks.settle(t0 + ms(2000)));
    }

    #[test]
    fn four_quick_clicks_open_nothing() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        let mut clicks = TripleClick::default();
        for i in 0..4 {
            clicks.click(t0 + ms(100 * i));
        }
        assert!(!clicks.settle(t0 + ms(900)));

        // The run is gone; a fresh one of three still counts.
        for i in 0..3 {
            clicks.click(t0 + ms(2000 + 100 * i));
        }
        assert!(clicks.settle(t0 + ms(2800)));
    }

    #[test]
    fn slow_clicks_start_a_new_run() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        let mut clicks = TripleClick::default();
        clicks.click(t0);
        clicks.click(t0 + ms(300));
        clicks.click(t0 + ms(900));
        assert!(!clicks.settle(t0 + ms(1400)));
        clicks.click(t0 + ms(1450));
        clicks.click(t0 + ms(1500));
        clicks.click(t0 + ms(1600));
        assert!(clicks.settle(t0 + ms(2100)));
    }

    #[test]
    fn title_triple_click_shows_panel() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut panel = Panel::new();
        panel.title_click(t0);
        panel.title_click(t0 + ms(100));
        panel.title_click(t0 + ms(200));
        assert_eq!(panel.settle_clicks(t0 + ms(300)), None);
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(panel.settle_clicks(t0 + ms(700)), Some(Command::ShowAdmin));
        assert_eq!(panel.state(), PanelState::Visible);
    }
}
