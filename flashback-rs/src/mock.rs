//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};

use crate::browser::{Browser, ClosedSession, Confirm};
use crate::error::{FlashbackError, Result};
use crate::model::{Candidate, TabRef};
use crate::theme::ThemeStore;

pub const NOW: i64 = 1_700_000_000_000;
pub const HOUR: i64 = 3_600_000;

#[derive(Default)]
pub struct MockBrowser {
    history: Vec<Candidate>,
    tabs: Vec<Candidate>,
    bookmarks: Vec<Candidate>,
    closed: Vec<ClosedSession>,
    fail: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl MockBrowser {
    pub fn with_history(mut self, url: &str, title: &str, visits: u32, hours_ago: i64) -> Self {
        self.history.push(Candidate::new_history(
            url.to_string(),
            Some(title.to_string()),
            Some(visits),
            Some(NOW - hours_ago * HOUR),
        ));
        self
    }

    pub fn with_tab(mut self, id: i32, url: &str, title: &str) -> Self {
        self.tabs.push(Candidate::new_tab(
            Some(url.to_string()),
            Some(title.to_string()),
            TabRef {
                tab_id: id,
                window_id: Some(100 + id),
            },
        ));
        self
    }

    pub fn with_bookmark(mut self, url: Option<&str>, title: &str) -> Self {
        self.bookmarks
            .push(Candidate::new_bookmark(url.map(str::to_string), Some(title.to_string())));
        self
    }

    pub fn with_closed(mut self, session: ClosedSession) -> Self {
        self.closed.push(session);
        self
    }

    pub fn failing(self) -> Self {
        self.fail.set(true);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            return Err(FlashbackError::browser("mock failure"));
        }
        Ok(())
    }
}

impl Browser for MockBrowser {
    fn history_search(&self, text: &str, start_time_ms: i64, max_results: usize) -> Result<Vec<Candidate>> {
        self.record(format!("history_search({}, {}, {})", text, start_time_ms, max_results))?;
        Ok(self
            .history
            .iter()
            .filter(|c| c.last_visit.unwrap_or(0) >= start_time_ms)
            .take(max_results)
            .cloned()
            .collect())
    }

    fn history_delete_all(&self) -> Result<()> {
        self.record("history_delete_all".to_string())
    }

    fn tabs_query_all(&self) -> Result<Vec<Candidate>> {
        self.record("tabs_query_all".to_string())?;
        Ok(self.tabs.clone())
    }

    fn tab_activate(&self, tab_id: i32, window_id: Option<i32>) -> Result<()> {
        self.record(format!("tab_activate({}, {:?})", tab_id, window_id))
    }

    fn window_focus(&self, window_id: i32) -> Result<()> {
        self.record(format!("window_focus({})", window_id))
    }

    fn tab_create(&self, url: &str) -> Result<()> {
        self.record(format!("tab_create({})", url))
    }

    fn recently_closed(&self, max_results: usize) -> Result<Vec<ClosedSession>> {
        self.record(format!("recently_closed({})", max_results))?;
        Ok(self.closed.iter().take(max_results).cloned().collect())
    }

    fn session_restore(&self, session_id: &str) -> Result<()> {
        self.record(format!("session_restore({})", session_id))
    }

    fn bookmarks_search(&self, query: &str) -> Result<Vec<Candidate>> {
        self.record(format!("bookmarks_search({})", query))?;
        Ok(self.bookmarks.clone())
    }

    fn bookmarks_recent(&self, n: usize) -> Result<Vec<Candidate>> {
        self.record(format!("bookmarks_recent({})", n))?;
        Ok(self.bookmarks.iter().take(n).cloned().collect())
    }

    fn clipboard_write(&self, text: &str) -> Result<()> {
        self.record(format!("clipboard_write({})", text))
    }
}

#[derive(Default)]
pub struct MemoryThemeStore {
    pub theme: RefCell<Option<String>>,
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.theme.borrow().clone())
    }

    fn set(&self, name: &str) -> Result<()> {
        *self.theme.borrow_mut() = Some(name.to_string());
        Ok(())
    }
}

/// Answers every prompt with a fixed reply and remembers being asked.
pub struct FixedConfirm {
    reply: bool,
    pub asked: Cell<u32>,
}

impl FixedConfirm {
    pub fn new(reply: bool) -> Self {
        Self {
            reply,
            asked: Cell::new(0),
        }
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.reply
    }
}
