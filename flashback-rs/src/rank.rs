use ahash::AHashSet;

use crate::fuzzy::fuzzy_score;
use crate::model::{normalize, Candidate, ScoredCandidate};
use crate::query::Query;

/// Maximum rows a result set may hold.
pub const MAX_RESULTS: usize = 20;

const REJECTED: f64 = -1.0;
const MIN_TEXT_SCORE: f64 = 10.0;
const TITLE_SUBSTRING_BONUS: f64 = 50.0;
const URL_SUBSTRING_BONUS: f64 = 30.0;
const MAX_FREQUENCY_BOOST: f64 = 20.0;
const RECENCY_WINDOW_HOURS: f64 = 50.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Score, filter, sort, de-duplicate and truncate candidates for a query.
///
/// Equal scores keep their input order. URLs are unique in the output and
/// at most [`MAX_RESULTS`] rows are returned.
pub fn rank(query: &Query, candidates: Vec<Candidate>, now_ms: i64) -> Vec<Candidate> {
    let q = normalize(&query.text);

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score_candidate(&candidate, &q, query.domain_filter.as_deref(), now_ms);
            ScoredCandidate { candidate, score }
        })
        .filter(|s| !s.is_excluded())
        .collect();

    // sort_by is stable, ties stay in input order
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    dedupe_by_url(scored.into_iter().map(|s| s.candidate), MAX_RESULTS)
}

/// Score a single candidate against a lowercased query text.
pub fn score_candidate(
    candidate: &Candidate,
    q: &str,
    domain_filter: Option<&str>,
    now_ms: i64,
) -> f64 {
    let Some(url) = candidate.url.as_deref() else {
        return REJECTED;
    };
    let url = normalize(url);

    if let Some(filter) = domain_filter {
        if !url.contains(filter) {
            return REJECTED;
        }
    }

    let mut score = if q.is_empty() {
        1.0
    } else {
        let title = normalize(candidate.title.as_deref().unwrap_or_default());
        let mut score = fuzzy_score(q, &title).max(fuzzy_score(q, &url)) as f64;

        if title.contains(q) {
            score += TITLE_SUBSTRING_BONUS;
        }
        if url.contains(q) {
            score += URL_SUBSTRING_BONUS;
        }

        if score < MIN_TEXT_SCORE {
            return REJECTED;
        }
        score
    };

    if let Some(visits) = candidate.visit_count {
        score += frequency_boost(visits);
    }

    if let Some(last_visit) = candidate.last_visit {
        let hours_ago = (now_ms - last_visit) as f64 / MS_PER_HOUR;
        score += recency_boost(hours_ago);
    }

    score
}

/// `min(ln(visits) * 5, 20)`; zero visits earn nothing.
pub fn frequency_boost(visits: u32) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    ((visits as f64).ln() * 5.0).min(MAX_FREQUENCY_BOOST)
}

/// `max(0, 50 - hours_ago)`.
pub fn recency_boost(hours_ago: f64) -> f64 {
    (RECENCY_WINDOW_HOURS - hours_ago).max(0.0)
}

/// Keep the first occurrence of every URL, up to `limit` rows.
///
/// Candidates without a de-duplication key (commands) are always kept.
pub fn dedupe_by_url(candidates: impl IntoIterator<Item = Candidate>, limit: usize) -> Vec<Candidate> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut results = Vec::with_capacity(limit);

    for candidate in candidates {
        if results.len() >= limit {
            break;
        }
        if let Some(key) = candidate.dedup_key() {
            if !seen.insert(key.to_string()) {
                continue;
            }
        }
        results.push(candidate);
    }

    results
}
