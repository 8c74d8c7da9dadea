//! [`Browser`] over an on-disk Chromium profile.

use std::cell::RefCell;
use std::collections::HashMap;
use std::process::Command;

use flashback_rs::error::{FlashbackError, Result};
use flashback_rs::{Browser, Candidate, ClosedSession};

use crate::bookmarks;
use crate::config::Config;
use crate::history;
use crate::tabs;

pub struct ProfileBrowser {
    config: Config,
    /// Urls of tabs returned by the last `tabs_query_all`, by tab id.
    tab_urls: RefCell<HashMap<i32, String>>,
    dry_run: bool,
}

impl ProfileBrowser {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tab_urls: RefCell::new(HashMap::new()),
            dry_run: false,
        }
    }

    /// Log navigation instead of launching the system opener.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn open_url(&self, url: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(url, "open (dry run)");
            return Ok(());
        }

        let status = opener(url).status()?;
        if !status.success() {
            return Err(FlashbackError::browser(format!(
                "opener exited with {} for {}",
                status, url
            )));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

fn browser_err(e: anyhow::Error) -> FlashbackError {
    FlashbackError::browser(format!("{:#}", e))
}

impl Browser for ProfileBrowser {
    fn history_search(&self, text: &str, start_time_ms: i64, max_results: usize) -> Result<Vec<Candidate>> {
        history::load_history(&self.config.history_path(), text, start_time_ms, max_results)
            .map_err(browser_err)
    }

    fn history_delete_all(&self) -> Result<()> {
        history::delete_all(&self.config.history_path())
            .map(|_| ())
            .map_err(browser_err)
    }

    fn tabs_query_all(&self) -> Result<Vec<Candidate>> {
        let tabs = tabs::load_tabs(&self.config.sessions_dir()).map_err(browser_err)?;

        let mut urls = self.tab_urls.borrow_mut();
        urls.clear();
        for tab in &tabs {
            if let (Some(tab_ref), Some(url)) = (&tab.tab, &tab.url) {
                urls.insert(tab_ref.tab_id, url.clone());
            }
        }
        Ok(tabs)
    }

    fn tab_activate(&self, tab_id: i32, _window_id: Option<i32>) -> Result<()> {
        if self.tab_urls.borrow().is_empty() {
            self.tabs_query_all()?;
        }
        let url = self
            .tab_urls
            .borrow()
            .get(&tab_id)
            .cloned()
            .ok_or_else(|| FlashbackError::browser(format!("unknown tab {}", tab_id)))?;
        self.open_url(&url)
    }

    fn window_focus(&self, window_id: i32) -> Result<()> {
        tracing::debug!(window_id, "window focus is a no-op for profile files");
        Ok(())
    }

    fn tab_create(&self, url: &str) -> Result<()> {
        self.open_url(url)
    }

    fn recently_closed(&self, _max_results: usize) -> Result<Vec<ClosedSession>> {
        Ok(Vec::new())
    }

    fn session_restore(&self, _session_id: &str) -> Result<()> {
        Err(FlashbackError::Unsupported("restoring closed sessions"))
    }

    fn bookmarks_search(&self, query: &str) -> Result<Vec<Candidate>> {
        let all = bookmarks::load_bookmarks(&self.config.bookmarks_path()).map_err(browser_err)?;
        Ok(bookmarks::search(all, query))
    }

    fn bookmarks_recent(&self, n: usize) -> Result<Vec<Candidate>> {
        let all = bookmarks::load_bookmarks(&self.config.bookmarks_path()).map_err(browser_err)?;
        Ok(bookmarks::recent(all, n))
    }

    fn clipboard_write(&self, text: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(text, "copy (dry run)");
            return Ok(());
        }
        let mut clipboard = arboard::Clipboard::new().map_err(FlashbackError::browser)?;
        clipboard.set_text(text).map_err(FlashbackError::browser)
    }
}
