//! Item filtering with exact and fuzzy matching.
//!
//! [`filter`] is the single entry point: given the items of the active
//! context, the query and a [`SearchMode`], it returns the visible subset in
//! display order. It is a pure function; the caller decides when to run it,
//! normally through the [`Debouncer`] so a burst of keystrokes collapses to a
//! single evaluation.
//!
//! # Matching
//!
//! ```text
//! query ──trim──► empty? ──yes──► items unchanged
//!                   │
//!                   no
//!                   ├── Exact ──► keep items where any field contains query (case-insensitive)
//!                   └── Fuzzy ──► score every field, keep best ≥ 0, sort by score desc (stable)
//! ```
//!
//! The fields consulted come from [`Context::search_fields`].
//!
//! # Example
//!
//! ```rust
//! use tabsift::domain::{Context, Item, HistoryItem};
//! use tabsift::search::{filter, SearchMode};
//!
//! let items = vec![Item::History(HistoryItem {
//!     url: "https://github.com".into(),
//!     title: "GitHub".into(),
//!     ..HistoryItem::default()
//! })];
//!
//! assert_eq!(filter(&items, Context::History, "GIT", SearchMode::Exact).len(), 1);
//! assert_eq!(filter(&items, Context::History, "ghb", SearchMode::Fuzzy).len(), 1);
//! ```

pub mod debounce;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};

use crate::domain::{Context, Item};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

/// Matching strategy used by [`filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring match, input order preserved.
    #[default]
    Exact,
    /// Case-insensitive subsequence match ranked by score.
    Fuzzy,
}

impl SearchMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Exact => Self::Fuzzy,
            Self::Fuzzy => Self::Exact,
        }
    }
}

/// Query text and matching mode of the active panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub mode: SearchMode,
}

/// Filters `items` for display in `context`.
///
/// # Parameters
///
/// * `items` - Full item set of the active context
/// * `context` - Active context, selects the searched field set
/// * `query` - Raw query text, trimmed before use
/// * `mode` - Exact or fuzzy matching
///
/// # Returns
///
/// The matching items. An empty (or all-whitespace) query returns a clone of
/// `items` in the original order. Never fails: missing fields read as `""`.
#[must_use]
pub fn filter(items: &[Item], context: Context, query: &str, mode: SearchMode) -> Vec<Item> {
    let query = query.trim();

    let _span = tracing::debug_span!(
        "filter",
        total_items = items.len(),
        query_len = query.len(),
        mode = ?mode,
        context = ?context
    )
    .entered();

    if query.is_empty() {
        return items.to_vec();
    }

    let filtered = match mode {
        SearchMode::Exact => exact(items, context, query),
        SearchMode::Fuzzy => fuzzy(items, context, query),
    };

    tracing::debug!(filtered_count = filtered.len(), "search filter applied");

    filtered
}

fn exact(items: &[Item], context: Context, query: &str) -> Vec<Item> {
    let needle = query.to_lowercase();
    let fields = context.search_fields();

    items
        .iter()
        .filter(|item| {
            fields
                .iter()
                .any(|&field| item.field(field).to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

fn fuzzy(items: &[Item], context: Context, query: &str) -> Vec<Item> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let fields = context.search_fields();

    let mut scored: Vec<(i64, &Item)> = items
        .iter()
        .filter_map(|item| {
            fields
                .iter()
                .filter_map(|&field| matcher.fuzzy_match(item.field(field), query))
                .max()
                .filter(|score| *score >= 0)
                .map(|score| (score, item))
        })
        .collect();

    // sort_by is stable: equal scores keep input order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().map(|(_, item)| item.clone()).collect()
}
