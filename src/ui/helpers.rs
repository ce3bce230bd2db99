//! Shared view-model helpers.
//!
//! Match highlighting and text shortening for row titles. Ranges are
//! `(start, end)` pairs of character indices (inclusive start, exclusive
//! end), so the presentation layer can slice by `chars()` without worrying
//! about UTF-8 boundaries.
//!
//! # Example
//!
//! ```rust
//! use tabsift::search::SearchMode;
//! use tabsift::ui::helpers::highlight_ranges;
//!
//! assert_eq!(highlight_ranges("tokio docs", "docs", SearchMode::Exact), vec![(6, 10)]);
//! assert_eq!(highlight_ranges("tokio docs", "", SearchMode::Fuzzy), vec![]);
//! ```

use crate::search::SearchMode;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Character ranges of `text` matched by `query` under `mode`.
///
/// Exact mode highlights the first case-insensitive occurrence; fuzzy mode
/// highlights the characters the Skim matcher picked, coalesced into
/// contiguous runs. No match, or an empty query, gives no ranges.
#[must_use]
pub fn highlight_ranges(text: &str, query: &str, mode: SearchMode) -> Vec<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() || text.is_empty() {
        return vec![];
    }

    match mode {
        SearchMode::Exact => exact_range(text, query).into_iter().collect(),
        SearchMode::Fuzzy => {
            let matcher = SkimMatcherV2::default().ignore_case();
            matcher
                .fuzzy_indices(text, query)
                .map_or_else(Vec::new, |(_score, indices)| coalesce(&indices))
        }
    }
}

fn exact_range(text: &str, query: &str) -> Option<(usize, usize)> {
    let haystack = text.to_lowercase();
    // lowercasing can change the char count outside ASCII; indices would drift
    if haystack.chars().count() != text.chars().count() {
        return None;
    }
    let needle = query.to_lowercase();
    let byte_pos = haystack.find(&needle)?;
    let start = haystack[..byte_pos].chars().count();
    Some((start, start + needle.chars().count()))
}

/// Merges sorted character indices into `(start, end)` runs.
fn coalesce(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = None;
    let mut prev = None;

    for &idx in indices {
        match (start, prev) {
            (None, _) => {
                start = Some(idx);
                prev = Some(idx);
            }
            (Some(_), Some(p)) if idx == p + 1 => {
                prev = Some(idx);
            }
            (Some(s), Some(p)) => {
                ranges.push((s, p + 1));
                start = Some(idx);
                prev = Some(idx);
            }
            _ => {}
        }
    }

    if let (Some(s), Some(p)) = (start, prev) {
        ranges.push((s, p + 1));
    }

    ranges
}

/// Shortens `text` to at most `max_chars` characters, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut shortened: String = text.chars().take(max_chars - 1).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_consecutive_indices() {
        assert_eq!(coalesce(&[0, 1, 2, 5, 7, 8]), vec![(0, 3), (5, 6), (7, 9)]);
        assert_eq!(coalesce(&[]), vec![]);
    }

    #[test]
    fn exact_highlight_is_case_insensitive() {
        assert_eq!(highlight_ranges("GitHub - rust", "hub", SearchMode::Exact), vec![(3, 6)]);
        assert_eq!(highlight_ranges("GitHub", "lab", SearchMode::Exact), vec![]);
    }

    #[test]
    fn fuzzy_highlight_covers_every_query_char() {
        let ranges = highlight_ranges("tabsift readme", "tsr", SearchMode::Fuzzy);
        let covered: usize = ranges.iter().map(|(s, e)| e - s).sum();
        assert_eq!(covered, 3);
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("héllo wörld", 20), "héllo wörld");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("abc", 0), "");
    }
}
