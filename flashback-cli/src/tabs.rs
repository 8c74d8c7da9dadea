use anyhow::{Context, Result};
use flashback_rs::{Candidate, TabRef};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const TAB_CAP: usize = 500;

/// One navigation entry from a session file.
struct Navigation {
    tab_id: i32,
    index: i32,
    url: String,
    title: String,
}

/// Open tabs from the newest session file. Session files carry no window
/// ids, so every tab has `window_id: None`.
pub fn load_tabs(sessions_dir: &Path) -> Result<Vec<Candidate>> {
    let session_file = find_newest_session_file(sessions_dir)?;

    let data = fs::read(&session_file)
        .with_context(|| format!("failed to read {}", session_file.display()))?;

    let snss = match snss::parse(&data) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(file = %session_file.display(), error = ?e, "failed to parse session file");
            return Ok(Vec::new());
        }
    };

    let navigations = snss.commands.into_iter().filter_map(|cmd| match cmd.content {
        snss::Content::Tab(tab) => Some(Navigation {
            tab_id: tab.id,
            index: tab.index,
            url: tab.url,
            title: tab.title,
        }),
        _ => None,
    });

    Ok(current_pages(navigations))
}

/// Keep the highest navigation index (the current page) per tab id.
fn current_pages(navigations: impl Iterator<Item = Navigation>) -> Vec<Candidate> {
    let mut tab_map: HashMap<i32, Navigation> = HashMap::new();

    for nav in navigations {
        if nav.url.is_empty() {
            continue;
        }
        match tab_map.get(&nav.tab_id) {
            Some(existing) if existing.index >= nav.index => {}
            _ => {
                tab_map.insert(nav.tab_id, nav);
            }
        }
    }

    let mut pages: Vec<Navigation> = tab_map.into_values().collect();
    pages.sort_by_key(|nav| nav.tab_id);

    pages
        .into_iter()
        .take(TAB_CAP)
        .map(|nav| {
            let title = Some(nav.title).filter(|t| !t.is_empty());
            Candidate::new_tab(
                Some(nav.url),
                title,
                TabRef {
                    tab_id: nav.tab_id,
                    window_id: None,
                },
            )
        })
        .collect()
}

fn find_newest_session_file(sessions_dir: &Path) -> Result<PathBuf> {
    if !sessions_dir.exists() {
        anyhow::bail!("sessions directory not found: {}", sessions_dir.display());
    }

    let mut candidates: Vec<_> = fs::read_dir(sessions_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("Tabs_") || name.starts_with("Session_")
        })
        .collect();

    // Tabs_* before Session_*, then newest first
    candidates.sort_by(|a, b| {
        let a_is_tabs = a.file_name().to_string_lossy().starts_with("Tabs_");
        let b_is_tabs = b.file_name().to_string_lossy().starts_with("Tabs_");

        b_is_tabs.cmp(&a_is_tabs).then_with(|| {
            let a_mtime = a.metadata().and_then(|m| m.modified()).ok();
            let b_mtime = b.metadata().and_then(|m| m.modified()).ok();
            b_mtime.cmp(&a_mtime)
        })
    });

    candidates
        .first()
        .map(|e| e.path())
        .ok_or_else(|| anyhow::anyhow!("no session files found in {}", sessions_dir.display()))
}
