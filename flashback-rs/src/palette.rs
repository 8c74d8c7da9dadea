use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::activate::{activate, Outcome};
use crate::browser::Host;
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::model::Candidate;
use crate::query::Query;
use crate::session::{Key, KeyOutcome, Session, Ticket};

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// A palette session bound to its collaborators.
///
/// Collaborator failures are logged and swallowed here: the previous
/// results stay visible and the palette keeps accepting input.
pub struct Palette<'a> {
    host: Host<'a>,
    session: Session,
    clock: fn() -> i64,
}

impl<'a> Palette<'a> {
    pub fn new(host: Host<'a>) -> Self {
        Self {
            host,
            session: Session::new(),
            clock: now_ms,
        }
    }

    /// Use a fixed wall clock (milliseconds since the Unix epoch).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Toggle event from the host; showing lists recent history.
    pub fn toggle(&mut self) {
        if self.session.toggle() {
            self.run_query("");
        }
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        self.session.on_input(text, now);
    }

    /// Fire the debounced query if it is due. Returns true when a query ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.session.due_query(now) {
            Some(text) => {
                self.run_query(&text);
                true
            }
            None => false,
        }
    }

    /// Dispatch `text` immediately and apply the results if still current.
    pub fn run_query(&mut self, text: &str) -> bool {
        let (ticket, query) = self.begin_query(text);
        let results = dispatch(&query, self.host.browser, (self.clock)());
        self.finish_query(ticket, &query, results)
    }

    /// Issue a ticket for `text`. Every earlier ticket becomes stale.
    pub fn begin_query(&mut self, text: &str) -> (Ticket, Query) {
        (self.session.issue(), Query::parse(text))
    }

    /// Apply the outcome of a query started with [`Palette::begin_query`].
    /// Returns true when the results replaced the visible list; stale
    /// tickets and failures leave it untouched.
    pub fn finish_query(&mut self, ticket: Ticket, query: &Query, results: Result<Vec<Candidate>>) -> bool {
        match results {
            Ok(results) => self.session.apply(ticket, results),
            Err(e) => {
                tracing::warn!(error = %e, input = %query.raw, "query failed, keeping previous results");
                false
            }
        }
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.session.handle_key(key);
        if let KeyOutcome::Activate(index) = outcome {
            self.activate_index(index);
        }
        outcome
    }

    /// Activate the row at `index` and follow the outcome.
    pub fn activate_index(&mut self, index: usize) -> Option<Outcome> {
        let item = self.session.results().get(index)?.clone();

        let outcome = match activate(&item, &self.host) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, title = item.display_title(), "activation failed");
                return None;
            }
        };

        match &outcome {
            Outcome::Close => self.session.hide(),
            Outcome::Stay => {}
            Outcome::Requery(text) => {
                self.session.set_input(text.clone());
                self.run_query(text);
            }
            Outcome::Prefill(text) => {
                self.session.set_input(text.clone());
                self.run_query(text);
            }
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HISTORY_WINDOW_MS;
    use crate::mock::{FixedConfirm, MemoryThemeStore, MockBrowser, NOW};
    use crate::session::DEBOUNCE;
    use std::time::Duration;

    fn fixed_now() -> i64 {
        NOW
    }

    fn collaborators(browser: MockBrowser, reply: bool) -> (MockBrowser, MemoryThemeStore, FixedConfirm) {
        (browser, MemoryThemeStore::default(), FixedConfirm::new(reply))
    }

    #[test]
    fn open_shows_recent_history() {
        let (browser, themes, confirm) =
            collaborators(MockBrowser::default().with_history("https://a.com", "A", 1, 1), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);

        palette.toggle();
        assert!(palette.session().is_visible());
        assert_eq!(palette.session().results().len(), 1);
    }

    #[test]
    fn typing_is_debounced() {
        let (browser, themes, confirm) =
            collaborators(MockBrowser::default().with_history("https://rust-lang.org", "Rust", 1, 1), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();

        let start = Instant::now();
        palette.input("r", start);
        palette.input("ru", start + Duration::from_millis(50));
        palette.input("rus", start + Duration::from_millis(100));
        assert!(!palette.tick(start + Duration::from_millis(150)));
        assert!(palette.tick(start + Duration::from_millis(100) + DEBOUNCE));

        // one query on open, one after the debounce
        let searches = browser
            .calls()
            .iter()
            .filter(|c| c.starts_with("history_search"))
            .count();
        assert_eq!(searches, 2);
    }

    #[test]
    fn failure_keeps_previous_results() {
        let (browser, themes, confirm) =
            collaborators(MockBrowser::default().with_tab(1, "https://a.com", "A"), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();
        assert!(palette.run_query("/tabs"));
        assert_eq!(palette.session().results().len(), 1);

        browser.set_failing(true);
        assert!(!palette.run_query("/tabs nothing"));
        assert_eq!(palette.session().results().len(), 1);
    }

    #[test]
    fn late_results_for_older_query_are_dropped() {
        let (browser, themes, confirm) = collaborators(
            MockBrowser::default()
                .with_tab(1, "https://rust-lang.org", "Rust")
                .with_tab(2, "https://python.org", "Python"),
            true,
        );
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();

        let (older, older_query) = palette.begin_query("/tabs");
        let (newer, newer_query) = palette.begin_query("/tabs python");

        let newer_rows = dispatch(&newer_query, &browser, NOW);
        assert!(palette.finish_query(newer, &newer_query, newer_rows));

        let older_rows = dispatch(&older_query, &browser, NOW);
        assert!(!palette.finish_query(older, &older_query, older_rows));

        let urls: Vec<_> = palette
            .session()
            .results()
            .iter()
            .map(|c| c.url.as_deref().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://python.org"]);
    }

    #[test]
    fn enter_on_history_row_closes() {
        let (browser, themes, confirm) =
            collaborators(MockBrowser::default().with_history("https://a.com", "A", 1, 1), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();

        assert_eq!(palette.key(Key::Enter), KeyOutcome::Activate(0));
        assert!(!palette.session().is_visible());
        assert!(browser.calls().contains(&"tab_create(https://a.com)".to_string()));
    }

    #[test]
    fn confirmed_clear_requeries_empty() {
        let (browser, themes, confirm) = collaborators(MockBrowser::default(), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();
        palette.run_query("/clear");

        assert_eq!(palette.activate_index(0), Some(Outcome::Requery(String::new())));
        assert_eq!(palette.session().input(), "");
        let expected = format!("history_search(, {}, 2000)", NOW - HISTORY_WINDOW_MS);
        assert_eq!(browser.calls().last(), Some(&expected));
    }

    #[test]
    fn help_row_prefills_input() {
        let (browser, themes, confirm) = collaborators(MockBrowser::default(), true);
        let mut palette = Palette::new(Host::new(&browser, &themes, &confirm)).with_clock(fixed_now);
        palette.toggle();
        palette.run_query("/help");

        let outcome = palette.activate_index(1);
        assert_eq!(outcome, Some(Outcome::Prefill("/tabs ".into())));
        assert_eq!(palette.session().input(), "/tabs ");
    }
}
