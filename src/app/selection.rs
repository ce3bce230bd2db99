//! Selected row and closed-row tracking.
//!
//! The selection is an index into the filtered item list. Rows that were
//! closed or deleted during the session stay in the list (so indices do not
//! shift under the user) and are recorded in a closed set instead; the
//! dispatcher refuses to act on them.
//!
//! All transitions take the current item count `n` so the state never holds
//! an index it cannot justify. With `n == 0` the index is pinned to 0.

use std::collections::HashSet;

/// Selection state of the active panel session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_index: usize,
    closed_ids: HashSet<String>,
}

impl SelectionState {
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    #[must_use]
    pub const fn closed_ids(&self) -> &HashSet<String> {
        &self.closed_ids
    }

    /// Moves down one row, wrapping to the top past the end.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tabsift::app::selection::SelectionState;
    ///
    /// let mut selection = SelectionState::default();
    /// selection.next(3);
    /// selection.next(3);
    /// selection.next(3);
    /// assert_eq!(selection.selected_index(), 0);
    /// ```
    pub fn next(&mut self, n: usize) {
        if n == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = (self.selected_index + 1) % n;
    }

    /// Moves up one row, wrapping to the bottom before the start.
    pub fn previous(&mut self, n: usize) {
        if n == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = (self.selected_index % n + n - 1) % n;
    }

    /// Jumps straight to `index`.
    ///
    /// The caller guarantees `index < n`; an out-of-range index is ignored.
    pub fn select_at(&mut self, index: usize, n: usize) {
        if index < n {
            self.selected_index = index;
        } else {
            tracing::debug!(index, item_count = n, "ignoring out-of-range selection");
        }
    }

    /// Records `id` as closed. Idempotent; the index is unchanged.
    pub fn mark_closed(&mut self, id: impl Into<String>) {
        self.closed_ids.insert(id.into());
    }

    #[must_use]
    pub fn is_closed(&self, id: &str) -> bool {
        self.closed_ids.contains(id)
    }

    /// Back to index 0 with an empty closed set.
    pub fn reset(&mut self) {
        self.selected_index = 0;
        self.closed_ids.clear();
    }

    /// Moves the index back to the top, keeping the closed set.
    pub fn rewind(&mut self) {
        self.selected_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_previous_are_cyclic() {
        for n in 1..=7 {
            for start in 0..n {
                let mut selection = SelectionState::default();
                selection.select_at(start, n);

                for _ in 0..n {
                    selection.next(n);
                }
                assert_eq!(selection.selected_index(), start);

                for _ in 0..n {
                    selection.previous(n);
                }
                assert_eq!(selection.selected_index(), start);
            }
        }
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut selection = SelectionState::default();
        selection.previous(5);
        assert_eq!(selection.selected_index(), 4);
    }

    #[test]
    fn empty_list_pins_to_zero() {
        let mut selection = SelectionState::default();
        selection.next(0);
        selection.previous(0);
        assert_eq!(selection.selected_index(), 0);
    }

    #[test]
    fn mark_closed_keeps_index() {
        let mut selection = SelectionState::default();
        selection.select_at(2, 4);
        selection.mark_closed("1:9");
        selection.mark_closed("1:9");

        assert_eq!(selection.selected_index(), 2);
        assert_eq!(selection.closed_ids().len(), 1);
        assert!(selection.is_closed("1:9"));

        selection.reset();
        assert_eq!(selection.selected_index(), 0);
        assert!(selection.closed_ids().is_empty());
    }

    #[test]
    fn select_at_ignores_out_of_range() {
        let mut selection = SelectionState::default();
        selection.select_at(3, 3);
        assert_eq!(selection.selected_index(), 0);
    }
}
