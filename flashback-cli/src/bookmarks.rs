use anyhow::{Context, Result};
use flashback_rs::Candidate;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize)]
struct BookmarkFile {
    roots: BookmarkRoots,
}

#[derive(Deserialize)]
struct BookmarkRoots {
    bookmark_bar: Option<BookmarkNode>,
    other: Option<BookmarkNode>,
    synced: Option<BookmarkNode>,
}

#[derive(Deserialize)]
struct BookmarkNode {
    name: Option<String>,
    #[serde(rename = "type")]
    node_type: Option<String>,
    url: Option<String>,
    /// Microseconds since 1601, stored as a decimal string.
    date_added: Option<String>,
    children: Option<Vec<BookmarkNode>>,
}

const MAX_BOOKMARKS: usize = 10000;

/// A url bookmark with the time it was added (Chromium microseconds).
pub struct Bookmark {
    pub title: String,
    pub url: String,
    pub date_added: i64,
}

impl Bookmark {
    fn matches(&self, terms: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let url = self.url.to_lowercase();
        terms
            .iter()
            .all(|term| title.contains(term.as_str()) || url.contains(term.as_str()))
    }

    pub fn into_candidate(self) -> Candidate {
        let title = Some(self.title).filter(|t| !t.is_empty());
        Candidate::new_bookmark(Some(self.url), title)
    }
}

pub fn load_bookmarks(bookmarks_path: &Path) -> Result<Vec<Bookmark>> {
    if !bookmarks_path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(bookmarks_path)
        .with_context(|| format!("failed to open bookmarks at {}", bookmarks_path.display()))?;

    let reader = BufReader::with_capacity(16 * 1024, file);
    let bookmark_file: BookmarkFile = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse bookmarks JSON at {}", bookmarks_path.display()))?;

    let mut entries = Vec::with_capacity(500);
    let roots = bookmark_file.roots;
    for node in [roots.bookmark_bar, roots.other, roots.synced].iter().flatten() {
        flatten_node(node, &mut entries);
    }

    Ok(entries)
}

/// Bookmarks whose title or url contains every whitespace-separated term.
pub fn search(bookmarks: Vec<Bookmark>, query: &str) -> Vec<Candidate> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    bookmarks
        .into_iter()
        .filter(|b| b.matches(&terms))
        .map(Bookmark::into_candidate)
        .collect()
}

/// The `n` most recently added bookmarks, newest first.
pub fn recent(mut bookmarks: Vec<Bookmark>, n: usize) -> Vec<Candidate> {
    bookmarks.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    bookmarks
        .into_iter()
        .take(n)
        .map(Bookmark::into_candidate)
        .collect()
}

fn flatten_node(node: &BookmarkNode, entries: &mut Vec<Bookmark>) {
    if entries.len() >= MAX_BOOKMARKS {
        return;
    }

    match node.node_type.as_deref().unwrap_or("unknown") {
        "url" => {
            if let Some(url) = &node.url {
                entries.push(Bookmark {
                    title: node.name.clone().unwrap_or_default(),
                    url: url.clone(),
                    date_added: node
                        .date_added
                        .as_deref()
                        .and_then(|d| d.parse().ok())
                        .unwrap_or(0),
                });
            }
        }
        "folder" => {
            for child in node.children.iter().flatten() {
                flatten_node(child, entries);
            }
        }
        _ => {}
    }
}
