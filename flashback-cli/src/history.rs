use anyhow::{Context, Result};
use flashback_rs::Candidate;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

const CHROMIUM_EPOCH_OFFSET: i64 = 11644473600000000;

/// Visible history entries visited at or after `start_ms`, newest first.
/// A non-empty `text` must appear in the url or title.
pub fn load_history(history_path: &Path, text: &str, start_ms: i64, limit: usize) -> Result<Vec<Candidate>> {
    let conn = open_immutable(history_path)?;

    let mut stmt = conn
        .prepare(
            "SELECT url, title, visit_count, last_visit_time
             FROM urls
             WHERE hidden = 0
               AND last_visit_time >= ?1
               AND (?2 = ''
                    OR url LIKE '%' || ?2 || '%' ESCAPE '\\'
                    OR title LIKE '%' || ?2 || '%' ESCAPE '\\')
             ORDER BY last_visit_time DESC
             LIMIT ?3",
        )
        .context("failed to prepare history query")?;

    let entries = stmt
        .query_map(params![unix_ms_to_chromium(start_ms), escape_like(text), limit as i64], |row| {
            let url: String = row.get(0)?;
            let title: Option<String> = row.get(1)?;
            let visit_count: i64 = row.get(2)?;
            let chromium_time: i64 = row.get(3)?;

            Ok(Candidate::new_history(
                url,
                title.filter(|t| !t.is_empty()),
                Some(visit_count.max(0) as u32),
                Some(chromium_to_unix_ms(chromium_time)),
            ))
        })
        .context("failed to execute history query")?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

/// Remove every history entry. The browser must not hold the database open.
pub fn delete_all(history_path: &Path) -> Result<usize> {
    let conn = Connection::open_with_flags(history_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .with_context(|| format!("failed to open history database at {}", history_path.display()))?;

    let has_visits: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'visits')",
            [],
            |row| row.get(0),
        )
        .context("failed to inspect history schema")?;

    if has_visits {
        conn.execute("DELETE FROM visits", [])
            .context("failed to delete visits")?;
    }
    let removed = conn
        .execute("DELETE FROM urls", [])
        .context("failed to delete history")?;

    tracing::info!(removed, "history cleared");
    Ok(removed)
}

/// Make `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn open_immutable(path: &Path) -> Result<Connection> {
    let uri = format!("file:{}?immutable=1", path.display());

    Connection::open_with_flags(&uri, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI)
        .with_context(|| format!("failed to open history database at {}", path.display()))
}

fn chromium_to_unix_ms(chromium_time: i64) -> i64 {
    (chromium_time - CHROMIUM_EPOCH_OFFSET) / 1000
}

fn unix_ms_to_chromium(unix_ms: i64) -> i64 {
    unix_ms * 1000 + CHROMIUM_EPOCH_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    fn create_history(with_visits: bool) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                title TEXT,
                visit_count INTEGER DEFAULT 0,
                last_visit_time INTEGER NOT NULL,
                hidden INTEGER DEFAULT 0
            );",
        )
        .unwrap();
        if with_visits {
            conn.execute_batch("CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER);")
                .unwrap();
            conn.execute("INSERT INTO visits (url) VALUES (1)", []).unwrap();
        }

        let rows: [(&str, Option<&str>, i64, i64, i64); 4] = [
            ("https://rust-lang.org", Some("Rust"), 12, NOW - HOUR, 0),
            ("https://docs.rs", Some(""), 3, NOW - 2 * HOUR, 0),
            ("https://old.example.com", Some("Old"), 1, NOW - 1000 * HOUR, 0),
            ("https://hidden.example.com", Some("Hidden"), 1, NOW, 1),
        ];
        for (url, title, visits, at, hidden) in rows {
            conn.execute(
                "INSERT INTO urls (url, title, visit_count, last_visit_time, hidden)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![url, title, visits, unix_ms_to_chromium(at), hidden],
            )
            .unwrap();
        }
        file
    }

    #[test]
    fn loads_window_newest_first() {
        let db = create_history(false);
        let entries = load_history(db.path(), "", NOW - 30 * 24 * HOUR, 100).unwrap();

        let urls: Vec<_> = entries.iter().map(|e| e.url.as_deref().unwrap()).collect();
        assert_eq!(urls, vec!["https://rust-lang.org", "https://docs.rs"]);
        assert_eq!(entries[0].visit_count, Some(12));
        assert_eq!(entries[0].last_visit, Some(NOW - HOUR));
        // empty titles are treated as missing
        assert_eq!(entries[1].title, None);
    }

    #[test]
    fn respects_limit_and_text() {
        let db = create_history(false);
        let entries = load_history(db.path(), "", 0, 1).unwrap();
        assert_eq!(entries.len(), 1);

        let entries = load_history(db.path(), "docs", 0, 100).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url.as_deref(), Some("https://docs.rs"));
    }

    #[test]
    fn text_wildcards_match_literally() {
        let db = create_history(false);
        let conn = Connection::open(db.path()).unwrap();
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time, hidden)
             VALUES ('https://example.com/100%_done', 'Progress', 1, ?1, 0)",
            params![unix_ms_to_chromium(NOW)],
        )
        .unwrap();
        drop(conn);

        for text in ["%", "_", "100%_"] {
            let entries = load_history(db.path(), text, 0, 100).unwrap();
            let urls: Vec<_> = entries.iter().map(|e| e.url.as_deref().unwrap()).collect();
            assert_eq!(urls, vec!["https://example.com/100%_done"], "text {:?}", text);
        }
        assert!(load_history(db.path(), "rust_lang", 0, 100).unwrap().is_empty());
    }

    #[test]
    fn escape_like_marks_wildcards() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like(""), "");
    }

    #[test]
    fn delete_all_empties_tables() {
        let db = create_history(true);
        assert_eq!(delete_all(db.path()).unwrap(), 4);

        let conn = Connection::open(db.path()).unwrap();
        let visits: i64 = conn
            .query_row("SELECT COUNT(*) FROM visits", [], |r| r.get(0))
            .unwrap();
        assert_eq!(visits, 0);
        assert!(load_history(db.path(), "", 0, 100).unwrap().is_empty());
    }

    #[test]
    fn delete_all_without_visits_table() {
        let db = create_history(false);
        assert_eq!(delete_all(db.path()).unwrap(), 4);
    }

    #[test]
    fn timestamp_conversion_round_trips() {
        assert_eq!(chromium_to_unix_ms(unix_ms_to_chromium(NOW)), NOW);
        assert_eq!(chromium_to_unix_ms(CHROMIUM_EPOCH_OFFSET), 0);
    }
}
