use flashback_rs::{Action, Candidate, CandidateKind};
use serde::Serialize;

const NO_RESULTS: &str = "No results found";

/// A result row as the front end shows it.
#[derive(Serialize)]
pub struct Row<'a> {
    pub index: usize,
    pub title: &'a str,
    pub detail: String,
    pub kind: CandidateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a Action>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

impl<'a> Row<'a> {
    pub fn new(index: usize, candidate: &'a Candidate, selected: bool) -> Self {
        Self {
            index,
            title: candidate.display_title(),
            detail: candidate.display_detail(),
            kind: candidate.kind,
            url: candidate.url.as_deref(),
            action: candidate.action.as_ref(),
            selected,
        }
    }
}

#[derive(Serialize)]
pub struct SearchResult<'a> {
    pub results: Vec<Row<'a>>,
    pub count: usize,
}

pub fn rows(candidates: &[Candidate], selected: Option<usize>) -> Vec<Row<'_>> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| Row::new(i, c, selected == Some(i)))
        .collect()
}

/// Newline-delimited JSON, one row per line.
pub fn print_rows(candidates: &[Candidate], selected: Option<usize>) {
    if candidates.is_empty() {
        println!("{}", serde_json::json!({ "title": NO_RESULTS }));
        return;
    }
    for row in rows(candidates, selected) {
        if let Ok(json) = serde_json::to_string(&row) {
            println!("{}", json);
        }
    }
}

pub fn print_search_result(candidates: &[Candidate]) {
    let result = SearchResult {
        results: rows(candidates, None),
        count: candidates.len(),
    };
    if let Ok(json) = serde_json::to_string(&result) {
        println!("{}", json);
    }
}
