//! Display and input mode types for the panel.
//!
//! [`RowDisplay`] is the row-height class: it fixes how many rows fit in the
//! list viewport and where the click thresholds fall. [`InputMode`] decides
//! how key presses are routed by the dispatcher.
//!
//! # Example
//!
//! ```rust
//! use tabsift::app::modes::{InputMode, RowDisplay};
//!
//! assert_eq!(RowDisplay::Compact.visible_row_count(), 11);
//! assert_eq!(RowDisplay::Expanded.visible_row_count(), 4);
//! assert_eq!(InputMode::default(), InputMode::List);
//! ```

use serde::{Deserialize, Serialize};

/// Height of the list viewport in pixels.
pub const LIST_VIEWPORT_HEIGHT: f64 = 440.0;

/// Row-height class of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowDisplay {
    /// One line per row.
    #[default]
    #[serde(alias = "one-line")]
    Compact,
    /// Title, url and details on separate lines.
    #[serde(alias = "multi-line")]
    Expanded,
}

impl RowDisplay {
    /// Rows that fit in the viewport at this height class.
    #[must_use]
    pub const fn visible_row_count(self) -> usize {
        match self {
            Self::Compact => 11,
            Self::Expanded => 4,
        }
    }

    /// Height of a single row in pixels.
    #[must_use]
    pub const fn row_height(self) -> f64 {
        match self {
            Self::Compact => 40.0,
            Self::Expanded => 110.0,
        }
    }

    /// Lower pixel edge of each visible slot, top to bottom.
    ///
    /// A click at `y` lies in slot `i` when `y` is below threshold `i` and at
    /// or above threshold `i - 1`.
    pub fn thresholds(self) -> impl Iterator<Item = f64> {
        let height = self.row_height();
        (1..=self.visible_row_count()).map(move |slot| height * slot as f64)
    }

    /// Returns the other height class.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Compact => Self::Expanded,
            Self::Expanded => Self::Compact,
        }
    }
}

/// How key presses are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigating the item list.
    #[default]
    List,
    /// The bookmark edit form is open.
    Editing,
    /// The list is replaced by the web-search engine list.
    WebSearch,
    /// Settings were rejected; the error list is shown until acknowledged.
    ShowingErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_cover_the_viewport() {
        for display in [RowDisplay::Compact, RowDisplay::Expanded] {
            let thresholds: Vec<f64> = display.thresholds().collect();
            assert_eq!(thresholds.len(), display.visible_row_count());
            assert!((thresholds[thresholds.len() - 1] - LIST_VIEWPORT_HEIGHT).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn expanded_fits_fewer_rows() {
        assert!(RowDisplay::Expanded.visible_row_count() < RowDisplay::Compact.visible_row_count());
        assert_eq!(RowDisplay::Compact.toggled(), RowDisplay::Expanded);
    }
}
