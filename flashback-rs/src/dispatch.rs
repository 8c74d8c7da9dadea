//! Turns a classified [`Query`] into a result list.

use crate::browser::{Browser, ClosedSession};
use crate::calculator::calculator_row;
use crate::commands::help_rows;
use crate::error::Result;
use crate::model::{normalize, Action, Candidate};
use crate::query::{Mode, Query};
use crate::rank::{rank, MAX_RESULTS};
use crate::theme::theme_rows;

/// How far back default search looks.
pub const HISTORY_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Raw history rows fetched per query before ranking.
pub const HISTORY_FETCH_LIMIT: usize = 2000;

/// Recently closed sessions requested from the browser.
pub const CLOSED_FETCH_LIMIT: usize = 25;

/// Produce the rows for `query`. Collaborator errors are returned to the
/// caller; local commands never fail.
pub fn dispatch(query: &Query, browser: &dyn Browser, now_ms: i64) -> Result<Vec<Candidate>> {
    tracing::debug!(mode = ?query.mode, text = %query.text, "dispatching query");

    match query.mode {
        Mode::Help => Ok(help_rows()),
        Mode::Calculator => Ok(vec![calculator_row(&query.text)]),
        Mode::ClearHistory => Ok(vec![clear_history_row()]),
        Mode::Tabs => search_tabs(browser, &query.text),
        Mode::Closed => search_closed(browser, &query.text),
        Mode::Bookmarks => search_bookmarks(browser, &query.text),
        Mode::Theme => Ok(theme_rows(&query.text)),
        Mode::Search => search_history(browser, query, now_ms),
    }
}

pub fn clear_history_row() -> Candidate {
    Candidate::new_command("Clear History", "Delete all browsing history", Action::ClearHistory)
}

fn matches_text(q: &str, title: Option<&str>, url: Option<&str>) -> bool {
    let hit = |field: Option<&str>| field.is_some_and(|f| !f.is_empty() && normalize(f).contains(q));
    hit(title) || hit(url)
}

/// Substring match on title or url over all open tabs.
pub fn search_tabs(browser: &dyn Browser, text: &str) -> Result<Vec<Candidate>> {
    let q = normalize(text);
    let tabs = browser.tabs_query_all()?;

    Ok(tabs
        .into_iter()
        .filter(|tab| matches_text(&q, tab.title.as_deref(), tab.url.as_deref()))
        .take(MAX_RESULTS)
        .collect())
}

pub fn closed_window_label(tab_count: usize) -> String {
    format!("Closed Window ({} tabs)", tab_count)
}

pub fn search_closed(browser: &dyn Browser, text: &str) -> Result<Vec<Candidate>> {
    let q = normalize(text);
    let sessions = browser.recently_closed(CLOSED_FETCH_LIMIT)?;

    Ok(sessions
        .into_iter()
        .filter_map(|session| match session {
            ClosedSession::Tab {
                session_id,
                title,
                url,
            } => {
                if !matches_text(&q, title.as_deref(), url.as_deref()) {
                    return None;
                }
                let title = title
                    .filter(|t| !t.is_empty())
                    .or_else(|| url.clone())
                    .unwrap_or_default();
                Some(Candidate::new_closed(url, title, session_id))
            }
            ClosedSession::Window {
                session_id,
                tab_count,
            } => {
                let label = closed_window_label(tab_count);
                if !normalize(&label).contains(&q) {
                    return None;
                }
                Some(Candidate::new_closed(None, label, session_id))
            }
        })
        .take(MAX_RESULTS)
        .collect())
}

pub fn search_bookmarks(browser: &dyn Browser, text: &str) -> Result<Vec<Candidate>> {
    let bookmarks = if text.is_empty() {
        browser.bookmarks_recent(MAX_RESULTS)?
    } else {
        browser.bookmarks_search(text)?
    };

    // folders carry no url
    Ok(bookmarks
        .into_iter()
        .filter(|b| b.url.is_some())
        .take(MAX_RESULTS)
        .collect())
}

pub fn search_history(browser: &dyn Browser, query: &Query, now_ms: i64) -> Result<Vec<Candidate>> {
    let start = now_ms - HISTORY_WINDOW_MS;
    let items = browser.history_search("", start, HISTORY_FETCH_LIMIT)?;
    let fetched = items.len();

    let results = rank(query, items, now_ms);
    tracing::debug!(fetched, ranked = results.len(), filter = ?query.domain_filter, "history ranked");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::RESULT_TITLE;
    use crate::commands::COMMANDS;
    use crate::mock::{MockBrowser, NOW};
    use crate::model::CandidateKind;
    use crate::theme::THEMES;

    fn run(input: &str, browser: &MockBrowser) -> Vec<Candidate> {
        dispatch(&Query::parse(input), browser, NOW).unwrap()
    }

    #[test]
    fn help_lists_registry() {
        let browser = MockBrowser::default();
        assert_eq!(run("/", &browser).len(), COMMANDS.len());
        assert_eq!(run("/help", &browser).len(), COMMANDS.len());
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn calculator_end_to_end() {
        let browser = MockBrowser::default();
        let rows = run("=2+2", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some(RESULT_TITLE));
        assert!(rows[0].detail.as_deref().unwrap().contains('4'));
    }

    #[test]
    fn clear_is_a_single_command_row() {
        let browser = MockBrowser::default();
        let rows = run("/clear", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, Some(Action::ClearHistory));
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn tabs_filter_on_title_or_url() {
        let browser = MockBrowser::default()
            .with_tab(1, "https://docs.rs/tokio", "Tokio docs")
            .with_tab(2, "https://github.com", "GitHub")
            .with_tab(3, "https://example.com/Rust", "");
        let rows = run("/tabs rust", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tab.unwrap().tab_id, 3);

        let rows = run("/tabs TOKIO", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, CandidateKind::Tab);
    }

    #[test]
    fn tabs_capped_at_twenty() {
        let mut browser = MockBrowser::default();
        for i in 0..30 {
            browser = browser.with_tab(i, &format!("https://t{}.com", i), "Tab");
        }
        assert_eq!(run("/tabs", &browser).len(), MAX_RESULTS);
    }

    #[test]
    fn closed_sessions_match_title_and_window_label() {
        let browser = MockBrowser::default()
            .with_closed(ClosedSession::Tab {
                session_id: "s1".into(),
                title: Some("Rust Blog".into()),
                url: Some("https://blog.rust-lang.org".into()),
            })
            .with_closed(ClosedSession::Window {
                session_id: "s2".into(),
                tab_count: 3,
            });

        let all = run("/closed", &browser);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].title.as_deref(), Some("Closed Window (3 tabs)"));
        assert_eq!(
            all[1].action,
            Some(Action::RestoreSession {
                session_id: "s2".into()
            })
        );

        let rows = run("/closed window", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, CandidateKind::ClosedTab);

        let rows = run("/closed blog", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url.as_deref(), Some("https://blog.rust-lang.org"));
    }

    #[test]
    fn bookmarks_empty_text_uses_recent() {
        let browser = MockBrowser::default()
            .with_bookmark(Some("https://a.com"), "A")
            .with_bookmark(None, "Folder");
        let rows = run("/bookmarks", &browser);
        assert_eq!(rows.len(), 1);
        assert!(browser.calls().contains(&"bookmarks_recent(20)".to_string()));
    }

    #[test]
    fn bookmarks_search_drops_folders() {
        let browser = MockBrowser::default()
            .with_bookmark(Some("https://news.com"), "News")
            .with_bookmark(None, "News folder");
        let rows = run("/bookmarks news", &browser);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url.as_deref(), Some("https://news.com"));
        assert!(browser.calls().contains(&"bookmarks_search(news)".to_string()));
    }

    #[test]
    fn theme_known_and_unknown() {
        let browser = MockBrowser::default();
        assert_eq!(run("/theme dracula", &browser).len(), 1);
        assert_eq!(run("/theme", &browser).len(), THEMES.len());
    }

    #[test]
    fn default_search_fetches_thirty_days() {
        let browser = MockBrowser::default().with_history("https://a.com", "A", 1, 1);
        let rows = run("", &browser);
        assert_eq!(rows.len(), 1);
        let expected = format!("history_search(, {}, 2000)", NOW - HISTORY_WINDOW_MS);
        assert!(browser.calls().contains(&expected));
    }

    #[test]
    fn empty_query_orders_recent_and_frequent_first() {
        let mut browser = MockBrowser::default();
        for i in 0..30 {
            browser = browser.with_history(&format!("https://site{}.com", i), "Site", 1, 100 + i);
        }
        browser = browser
            .with_history("https://frequent.com", "Frequent", 500, 300)
            .with_history("https://fresh.com", "Fresh", 1, 0);

        let rows = run("", &browser);
        assert_eq!(rows.len(), MAX_RESULTS);
        assert_eq!(rows[0].url.as_deref(), Some("https://fresh.com"));
        assert_eq!(rows[1].url.as_deref(), Some("https://frequent.com"));
    }

    #[test]
    fn browser_failure_propagates() {
        let browser = MockBrowser::default().failing();
        assert!(dispatch(&Query::parse("/tabs"), &browser, NOW).is_err());
        assert!(dispatch(&Query::parse("rust"), &browser, NOW).is_err());
        // local commands still work
        assert!(dispatch(&Query::parse("=1+1"), &browser, NOW).is_ok());
    }
}
