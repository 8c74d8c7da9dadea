//! Subsequence scorer used to rank history titles and URLs.

const MATCH_POINTS: u32 = 10;
const RUN_BONUS: u32 = 5;

/// Score how well `pattern` matches `text` as an in-order subsequence.
///
/// Both inputs are expected to be case-normalized already. The scan is a
/// single greedy pass: every matched char earns 10 points plus 5 for each
/// match immediately before it in `text`. Returns 0 when the pattern is not
/// fully consumed, or when either input is empty.
pub fn fuzzy_score(pattern: &str, text: &str) -> u32 {
    if pattern.is_empty() || text.is_empty() {
        return 0;
    }

    let mut pattern_chars = pattern.chars().peekable();
    let mut score = 0;
    let mut run = 0;

    for c in text.chars() {
        let Some(&want) = pattern_chars.peek() else {
            break;
        };
        if c == want {
            score += MATCH_POINTS + RUN_BONUS * run;
            run += 1;
            pattern_chars.next();
        } else {
            run = 0;
        }
    }

    if pattern_chars.peek().is_some() {
        return 0;
    }

    score
}
