//! Per-overlay palette state: visibility, result list, selection cursor,
//! input debounce and the stale-response guard.
//!
//! A [`Session`] lives as long as the overlay that owns it. Every query it
//! issues gets a [`Ticket`]; a result list is only applied when its ticket
//! is still the most recent one, so a slow response can never overwrite
//! fresher results.

use std::time::{Duration, Instant};

use crate::model::Candidate;

/// Delay between the last keystroke and the query it triggers.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Sequence number of an issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Keys the palette reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

/// Result of feeding a key to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Hide the palette.
    Close,
    /// Activate the row at this index.
    Activate(usize),
    /// Selection moved (or stayed clamped).
    Moved(usize),
    Ignored,
}

/// Coalesces rapid input into one query per quiet period.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `input`, replacing anything not yet fired.
    pub fn schedule(&mut self, input: impl Into<String>, now: Instant) {
        self.pending = Some((input.into(), now + self.delay));
    }

    /// Take the pending input if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(input, _)| input),
            _ => None,
        }
    }

    /// Take the pending input immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(input, _)| input)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    visible: bool,
    input: String,
    results: Vec<Candidate>,
    selected: Option<usize>,
    last_issued: u64,
    debouncer: Debouncer,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &[Candidate] {
        &self.results
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Show or hide the overlay. Returns true when it was just shown, in
    /// which case the caller should run an empty query to list recent
    /// history.
    pub fn toggle(&mut self) -> bool {
        if self.visible {
            self.hide();
            return false;
        }
        self.visible = true;
        self.input.clear();
        self.results.clear();
        self.selected = None;
        self.debouncer.cancel();
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.debouncer.cancel();
    }

    /// Record an input event; the query fires after [`DEBOUNCE`].
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        self.debouncer.schedule(self.input.clone(), now);
    }

    /// Input whose debounce period has elapsed, if any.
    pub fn due_query(&mut self, now: Instant) -> Option<String> {
        self.debouncer.poll(now)
    }

    /// Input still waiting on the debounce, taken immediately.
    pub fn flush_query(&mut self) -> Option<String> {
        self.debouncer.flush()
    }

    /// Replace the input text without going through the debounce.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.debouncer.cancel();
    }

    /// Start a new query; older tickets become stale.
    pub fn issue(&mut self) -> Ticket {
        self.last_issued += 1;
        Ticket(self.last_issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.last_issued
    }

    /// Apply results for `ticket`. Stale tickets are dropped and false is
    /// returned. Applying resets the selection.
    pub fn apply(&mut self, ticket: Ticket, results: Vec<Candidate>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.last_issued, "dropping stale results");
            return false;
        }
        self.results = results;
        self.selected = None;
        true
    }

    /// Row Enter would activate: the selection, else the first row.
    pub fn enter_target(&self) -> Option<usize> {
        if self.results.is_empty() {
            return None;
        }
        Some(self.selected.filter(|i| *i < self.results.len()).unwrap_or(0))
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if key == Key::Escape {
            self.hide();
            return KeyOutcome::Close;
        }

        if self.results.is_empty() {
            return KeyOutcome::Ignored;
        }
        let last = self.results.len() - 1;

        match key {
            Key::Down => {
                let next = self.selected.map_or(0, |i| (i + 1).min(last));
                self.selected = Some(next);
                KeyOutcome::Moved(next)
            }
            Key::Up => {
                let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
                self.selected = Some(prev);
                KeyOutcome::Moved(prev)
            }
            Key::Enter => self
                .enter_target()
                .map_or(KeyOutcome::Ignored, KeyOutcome::Activate),
            Key::Escape => KeyOutcome::Close,
        }
    }
}
