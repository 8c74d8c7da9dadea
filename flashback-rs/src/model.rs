use serde::Serialize;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    History,
    Tab,
    Bookmark,
    ClosedTab,
    Command,
}

/// An open tab, addressable by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabRef {
    pub tab_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
}

/// What activating a row does when it is not a plain URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Copy text and close the palette.
    CopyToClipboard { text: String },
    /// Delete all browsing history after the user confirms.
    ClearHistory,
    /// Apply and persist a theme.
    ApplyTheme { name: String },
    /// Reopen a recently closed tab or window.
    RestoreSession { session_id: String },
    /// Replace the input text (help rows).
    Prefill { text: String },
    Noop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub kind: CandidateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<TabRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Candidate {
    fn base(kind: CandidateKind, url: Option<String>, title: Option<String>) -> Self {
        Self {
            title,
            url,
            detail: None,
            kind,
            visit_count: None,
            last_visit: None,
            tab: None,
            action: None,
        }
    }

    pub fn new_history(
        url: String,
        title: Option<String>,
        visit_count: Option<u32>,
        last_visit: Option<i64>,
    ) -> Self {
        Self {
            visit_count,
            last_visit,
            ..Self::base(CandidateKind::History, Some(url), title)
        }
    }

    pub fn new_bookmark(url: Option<String>, title: Option<String>) -> Self {
        Self::base(CandidateKind::Bookmark, url, title)
    }

    pub fn new_tab(url: Option<String>, title: Option<String>, tab: TabRef) -> Self {
        Self {
            tab: Some(tab),
            ..Self::base(CandidateKind::Tab, url, title)
        }
    }

    pub fn new_closed(
        url: Option<String>,
        title: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            action: Some(Action::RestoreSession {
                session_id: session_id.into(),
            }),
            ..Self::base(CandidateKind::ClosedTab, url, Some(title.into()))
        }
    }

    pub fn new_command(title: impl Into<String>, detail: impl Into<String>, action: Action) -> Self {
        Self {
            detail: Some(detail.into()),
            action: Some(action),
            ..Self::base(CandidateKind::Command, None, Some(title.into()))
        }
    }

    /// Primary row text: title, then url, then a placeholder.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.url.as_deref())
            .unwrap_or("Untitled")
    }

    /// Secondary row text.
    pub fn display_detail(&self) -> String {
        let url = self.url.as_deref().unwrap_or_default();
        if self.action.is_some() {
            self.detail.as_deref().unwrap_or(url).to_string()
        } else if self.tab.is_some() {
            format!("Switch to Tab: {}", url)
        } else {
            url.to_string()
        }
    }

    /// De-duplication key; commands never collapse into each other.
    pub fn dedup_key(&self) -> Option<&str> {
        match self.kind {
            CandidateKind::Command => None,
            _ => self.url.as_deref(),
        }
    }
}

/// A candidate with its score for the current query.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn is_excluded(&self) -> bool {
        self.score <= 0.0
    }
}

pub fn normalize(s: &str) -> String {
    s.to_lowercase()
}
