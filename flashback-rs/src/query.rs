//! Classifies raw palette input into a dispatch mode.
//!
//! Classification is one ordered predicate chain where the first match
//! wins. The resulting [`Query`] carries the residual text each mode
//! searches with.

use crate::model::normalize;

/// Dispatch target for a piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Help,
    Calculator,
    ClearHistory,
    Tabs,
    Closed,
    Bookmarks,
    Theme,
    Search,
}

pub const HELP_PREFIX: &str = "/help";
pub const CALC_PREFIX: &str = "=";
pub const CLEAR_COMMAND: &str = "/clear";
pub const TABS_PREFIX: &str = "/tabs";
pub const CLOSED_PREFIX: &str = "/closed";
pub const BOOKMARKS_PREFIX: &str = "/bookmarks";
pub const THEME_PREFIX: &str = "/theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Trimmed input as typed.
    pub raw: String,
    pub mode: Mode,
    /// Text left after stripping the mode prefix (and domain filter).
    pub text: String,
    /// Lowercase URL substring constraint from `domain:query` syntax.
    pub domain_filter: Option<String>,
}

impl Query {
    pub fn parse(input: &str) -> Self {
        let raw = input.trim();

        let (mode, text, domain_filter) = if raw == "/" || raw == HELP_PREFIX {
            (Mode::Help, String::new(), None)
        } else if let Some(rest) = raw.strip_prefix(CALC_PREFIX) {
            (Mode::Calculator, rest.to_string(), None)
        } else if raw == CLEAR_COMMAND {
            (Mode::ClearHistory, String::new(), None)
        } else if let Some(rest) = raw.strip_prefix(TABS_PREFIX) {
            (Mode::Tabs, rest.trim().to_string(), None)
        } else if let Some(rest) = raw.strip_prefix(CLOSED_PREFIX) {
            (Mode::Closed, rest.trim().to_string(), None)
        } else if let Some(rest) = raw.strip_prefix(BOOKMARKS_PREFIX) {
            (Mode::Bookmarks, rest.trim().to_string(), None)
        } else if let Some(rest) = raw.strip_prefix(THEME_PREFIX) {
            (Mode::Theme, normalize(rest.trim()), None)
        } else {
            let (filter, text) = split_domain_filter(raw);
            (Mode::Search, text.to_string(), filter)
        };

        Self {
            raw: raw.to_string(),
            mode,
            text,
            domain_filter,
        }
    }
}

/// Split `domain:query` into a lowercase filter and the remaining text.
///
/// The colon must sit strictly inside the input (not first, not last) and
/// the prefix must contain no whitespace; otherwise the whole input is text.
pub fn split_domain_filter(raw: &str) -> (Option<String>, &str) {
    let Some(colon) = raw.find(':') else {
        return (None, raw);
    };
    if colon == 0 || colon + 1 >= raw.len() {
        return (None, raw);
    }

    let prefix = raw[..colon].trim();
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        return (None, raw);
    }

    (Some(normalize(prefix)), raw[colon + 1..].trim())
}
