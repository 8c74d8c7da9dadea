//! What happens when a row is chosen.

use crate::browser::Host;
use crate::error::Result;
use crate::model::{Action, Candidate};
use crate::theme::apply_theme;

pub const CLEAR_HISTORY_PROMPT: &str =
    "Are you sure you want to clear your entire browsing history?";

/// What the palette should do after an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Hide the palette.
    Close,
    /// Keep the palette open as it is.
    Stay,
    /// Run a fresh query with this text.
    Requery(String),
    /// Replace the input text and query with it.
    Prefill(String),
}

/// Activate a row: run its action, switch to its tab, or open its URL.
pub fn activate(item: &Candidate, host: &Host<'_>) -> Result<Outcome> {
    if let Some(action) = &item.action {
        return run_action(action, host);
    }

    let browser = host.browser;

    if let Some(tab) = item.tab {
        focus_tab(host, tab.tab_id, tab.window_id)?;
        return Ok(Outcome::Close);
    }

    let Some(url) = item.url.as_deref() else {
        tracing::debug!(title = item.display_title(), "row has nothing to activate");
        return Ok(Outcome::Stay);
    };

    let open_tab = match browser.tabs_query_all() {
        Ok(tabs) => tabs
            .into_iter()
            .find(|t| t.url.as_deref() == Some(url))
            .and_then(|t| t.tab),
        Err(e) => {
            tracing::warn!(error = %e, "tab lookup failed, opening a new tab");
            None
        }
    };

    match open_tab {
        Some(tab) => focus_tab(host, tab.tab_id, tab.window_id)?,
        None => browser.tab_create(url)?,
    }

    Ok(Outcome::Close)
}

fn focus_tab(host: &Host<'_>, tab_id: i32, window_id: Option<i32>) -> Result<()> {
    if let Some(window_id) = window_id {
        host.browser.window_focus(window_id)?;
    }
    host.browser.tab_activate(tab_id, window_id)
}

fn run_action(action: &Action, host: &Host<'_>) -> Result<Outcome> {
    match action {
        Action::CopyToClipboard { text } => {
            host.browser.clipboard_write(text)?;
            Ok(Outcome::Close)
        }
        Action::ClearHistory => {
            if !host.confirm.confirm(CLEAR_HISTORY_PROMPT) {
                tracing::debug!("history clear declined");
                return Ok(Outcome::Stay);
            }
            host.browser.history_delete_all()?;
            tracing::info!("browsing history cleared");
            Ok(Outcome::Requery(String::new()))
        }
        Action::ApplyTheme { name } => {
            let applied = apply_theme(host.themes, name)?;
            tracing::debug!(theme = %applied, "theme applied");
            Ok(Outcome::Stay)
        }
        Action::RestoreSession { session_id } => {
            host.browser.session_restore(session_id)?;
            Ok(Outcome::Close)
        }
        Action::Prefill { text } => Ok(Outcome::Prefill(text.clone())),
        Action::Noop => Ok(Outcome::Stay),
    }
}
