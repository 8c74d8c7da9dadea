//! Capabilities the palette consumes from its host browser.

use crate::error::Result;
use crate::model::Candidate;
use crate::theme::ThemeStore;

/// A recently closed tab or window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosedSession {
    Tab {
        session_id: String,
        title: Option<String>,
        url: Option<String>,
    },
    Window {
        session_id: String,
        tab_count: usize,
    },
}

/// Browser storage and window control.
///
/// Searches return raw candidates; filtering and ranking happen in the
/// engine. Every call may fail; the palette logs failures and stays usable.
pub trait Browser {
    /// History visited at or after `start_time_ms`, at most `max_results`.
    fn history_search(&self, text: &str, start_time_ms: i64, max_results: usize) -> Result<Vec<Candidate>>;

    fn history_delete_all(&self) -> Result<()>;

    /// All open tabs, with tab ids.
    fn tabs_query_all(&self) -> Result<Vec<Candidate>>;

    fn tab_activate(&self, tab_id: i32, window_id: Option<i32>) -> Result<()>;

    fn window_focus(&self, window_id: i32) -> Result<()>;

    fn tab_create(&self, url: &str) -> Result<()>;

    fn recently_closed(&self, max_results: usize) -> Result<Vec<ClosedSession>>;

    fn session_restore(&self, session_id: &str) -> Result<()>;

    fn bookmarks_search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// The `n` most recently added bookmarks.
    fn bookmarks_recent(&self, n: usize) -> Result<Vec<Candidate>>;

    fn clipboard_write(&self, text: &str) -> Result<()>;
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Everything dispatch and activation need from the outside world.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub browser: &'a dyn Browser,
    pub themes: &'a dyn ThemeStore,
    pub confirm: &'a dyn Confirm,
}

impl<'a> Host<'a> {
    pub fn new(
        browser: &'a dyn Browser,
        themes: &'a dyn ThemeStore,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            browser,
            themes,
            confirm,
        }
    }
}
