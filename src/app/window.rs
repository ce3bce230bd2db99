//! Viewport window controller.
//!
//! The list is virtualized: only the rows in [`ViewportWindow`] `[first, last]`
//! are on screen, and moving the window means issuing one scroll instruction
//! to `row_height × first`. This module decides where the window goes after
//! every selection change so the selected row is always visible, without
//! jumping the viewport more than necessary.
//!
//! # Architecture
//!
//! The window position and the last click coordinate live in a
//! [`NavigationSession`] owned by the panel state. The positioning rules are
//! pure functions over that data:
//!
//! ```text
//!                 ┌──── click Y pending? ────┐
//!                 │ yes                      │ no
//!                 ▼                          ▼
//!        click_window(sel, y)      keyboard_window(window, sel, n)
//!   keep the clicked slot under    1. sel = 0 above top   → [0, vc-1]
//!   the cursor                     2. sel = n-1 below end → [n-vc, n-1]
//!                 │                3. sel > last          → slide down
//!                 │                4. sel < first         → slide up
//!                 │                5. sel = last, short   → align bottom
//!                 └──────────┬───────────────┘
//!                            ▼
//!              click marker cleared, ScrollTo if moved
//! ```
//!
//! Arithmetic saturates at zero, so short lists and wrap-arounds never
//! produce negative bounds.

use super::modes::RowDisplay;
use serde::Serialize;

/// Visible row range, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportWindow {
    pub first: usize,
    pub last: usize,
}

impl ViewportWindow {
    #[must_use]
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Window showing the top of the list.
    #[must_use]
    pub const fn top(display: RowDisplay) -> Self {
        Self::new(0, display.visible_row_count() - 1)
    }

    /// `vc` rows starting at `first`.
    #[must_use]
    pub const fn from_first(first: usize, visible_count: usize) -> Self {
        Self::new(first, first + visible_count.saturating_sub(1))
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last < self.first
    }
}

/// Scroll instruction for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollTo {
    /// Pixel offset from the top of the list.
    pub offset: f64,
    pub window: ViewportWindow,
}

/// Window placement for a click at `click_y` that selected `selected`.
///
/// The first threshold greater than `click_y` gives the clicked slot `i`;
/// the window is placed so that `selected` sits in slot `i`. A click past
/// every threshold anchors `selected` at the bottom slot.
#[must_use]
pub fn click_window(selected: usize, click_y: f64, display: RowDisplay) -> ViewportWindow {
    let visible = display.visible_row_count();

    match display.thresholds().position(|threshold| click_y < threshold) {
        Some(slot) => ViewportWindow::from_first(selected.saturating_sub(slot), visible),
        None => ViewportWindow::new(selected.saturating_sub(visible - 1), selected),
    }
}

/// Window placement after a keyboard move to `selected` among `n` rows.
///
/// See the module docs for the five cases, evaluated in order.
#[must_use]
pub fn keyboard_window(
    window: ViewportWindow,
    selected: usize,
    n: usize,
    display: RowDisplay,
) -> ViewportWindow {
    let visible = display.visible_row_count();

    if selected == 0 && selected < window.first {
        return ViewportWindow::top(display);
    }

    if selected + 1 == n && selected > window.last {
        return ViewportWindow::new(n.saturating_sub(visible), n - 1);
    }

    if selected > window.last {
        let shift = selected - window.last;
        return ViewportWindow::new(window.first + shift, window.last + shift);
    }

    if selected < window.first {
        let shift = window.first - selected;
        return ViewportWindow::new(window.first - shift, window.last - shift);
    }

    if selected == window.last && window.len() < visible {
        return ViewportWindow::new(window.last.saturating_sub(visible - 1), window.last);
    }

    window
}

/// Scroll position state of one panel session.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSession {
    window: ViewportWindow,
    pending_click_y: Option<f64>,
    display: RowDisplay,
}

impl NavigationSession {
    #[must_use]
    pub const fn new(display: RowDisplay) -> Self {
        Self {
            window: ViewportWindow::top(display),
            pending_click_y: None,
            display,
        }
    }

    #[must_use]
    pub const fn window(&self) -> ViewportWindow {
        self.window
    }

    #[must_use]
    pub const fn row_display(&self) -> RowDisplay {
        self.display
    }

    #[must_use]
    pub const fn pending_click_y(&self) -> Option<f64> {
        self.pending_click_y
    }

    /// Marks the next reconciliation as click-driven.
    pub fn record_click(&mut self, click_y: f64) {
        self.pending_click_y = Some(click_y);
    }

    /// Window back to the top, click marker cleared.
    pub fn reset(&mut self) {
        self.window = ViewportWindow::top(self.display);
        self.pending_click_y = None;
    }

    /// Repositions the window after the selection changed.
    ///
    /// # Parameters
    ///
    /// * `selected` - New selected index
    /// * `n` - Number of rows in the filtered list
    ///
    /// # Returns
    ///
    /// `Some(ScrollTo)` when the window moved, `None` when it stayed or the
    /// list is empty.
    pub fn reconcile(&mut self, selected: usize, n: usize) -> Option<ScrollTo> {
        let click_y = self.pending_click_y.take();

        if n == 0 {
            return None;
        }

        let next = match click_y {
            Some(y) => click_window(selected, y, self.display),
            None => keyboard_window(self.window, selected, n, self.display),
        };

        tracing::debug!(
            selected,
            item_count = n,
            click_y = ?click_y,
            first = next.first,
            last = next.last,
            "viewport reconciled"
        );

        self.apply(next)
    }

    /// Switches the row-height class and recomputes the window.
    ///
    /// The keyboard rules first run on the old window under the new row
    /// count, so a selection on the bottom edge of a window that just grew
    /// stays on the bottom edge. The result then takes the new length from
    /// its top row and the rules run again to keep the selection in view.
    pub fn set_row_display(&mut self, display: RowDisplay, selected: usize, n: usize) -> Option<ScrollTo> {
        self.display = display;
        self.pending_click_y = None;
        let visible = display.visible_row_count();

        if n == 0 {
            self.window = ViewportWindow::from_first(self.window.first, visible);
            return None;
        }

        let aligned = keyboard_window(self.window, selected, n, display);
        let resized = ViewportWindow::from_first(aligned.first, visible);
        self.window = keyboard_window(resized, selected, n, display);
        Some(self.scroll_instruction())
    }

    fn apply(&mut self, next: ViewportWindow) -> Option<ScrollTo> {
        if next == self.window {
            return None;
        }
        self.window = next;
        Some(self.scroll_instruction())
    }

    fn scroll_instruction(&self) -> ScrollTo {
        ScrollTo {
            offset: self.display.row_height() * self.window.first as f64,
            window: self.window,
        }
    }
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(RowDisplay::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT: RowDisplay = RowDisplay::Compact;

    #[test]
    fn stepping_past_bottom_slides_by_one() {
        let mut session = NavigationSession::new(COMPACT);
        let scroll = session.reconcile(11, 25).unwrap();

        assert_eq!(scroll.window, ViewportWindow::new(1, 11));
        assert!((scroll.offset - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stepping_inside_window_does_not_scroll() {
        let mut session = NavigationSession::new(COMPACT);
        assert_eq!(session.reconcile(5, 25), None);
        assert_eq!(session.window(), ViewportWindow::new(0, 10));
    }

    #[test]
    fn stepping_past_top_slides_up() {
        let window = ViewportWindow::new(5, 15);
        assert_eq!(keyboard_window(window, 4, 25, COMPACT), ViewportWindow::new(4, 14));
    }

    #[test]
    fn wrapping_to_top_snaps_to_start() {
        let window = ViewportWindow::new(14, 24);
        assert_eq!(keyboard_window(window, 0, 25, COMPACT), ViewportWindow::new(0, 10));
    }

    #[test]
    fn wrapping_to_bottom_snaps_to_end() {
        let window = ViewportWindow::new(0, 10);
        assert_eq!(keyboard_window(window, 24, 25, COMPACT), ViewportWindow::new(14, 24));
    }

    #[test]
    fn short_list_end_snap_saturates() {
        let window = ViewportWindow::new(0, 3);
        assert_eq!(
            keyboard_window(window, 5, 6, RowDisplay::Expanded),
            ViewportWindow::new(2, 5)
        );
        assert_eq!(
            keyboard_window(ViewportWindow::new(0, 1), 2, 3, COMPACT),
            ViewportWindow::new(0, 2)
        );
    }

    #[test]
    fn click_keeps_clicked_slot_under_cursor() {
        let mut session = NavigationSession::new(COMPACT);
        session.window = ViewportWindow::new(5, 15);

        // third slot spans 80..120 px
        session.record_click(95.0);
        assert_eq!(session.reconcile(7, 20), None);
        assert_eq!(session.window(), ViewportWindow::new(5, 15));
        assert_eq!(session.pending_click_y(), None);
    }

    #[test]
    fn click_past_thresholds_anchors_bottom() {
        assert_eq!(click_window(20, 1000.0, COMPACT), ViewportWindow::new(10, 20));
        assert_eq!(click_window(3, 1000.0, COMPACT), ViewportWindow::new(0, 3));
    }

    #[test]
    fn click_on_first_slot() {
        assert_eq!(click_window(9, 0.0, COMPACT), ViewportWindow::new(9, 19));
        assert_eq!(
            click_window(9, 39.9, RowDisplay::Expanded),
            ViewportWindow::new(9, 12)
        );
    }

    #[test]
    fn click_marker_is_consumed_once() {
        let mut session = NavigationSession::new(COMPACT);
        session.record_click(0.0);
        let scroll = session.reconcile(12, 30).unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(12, 22));

        // next keyboard step uses the keyboard rules
        assert_eq!(session.reconcile(13, 30), None);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut session = NavigationSession::new(COMPACT);
        session.record_click(10.0);
        assert_eq!(session.reconcile(0, 0), None);
        assert_eq!(session.window(), ViewportWindow::new(0, 10));
        assert_eq!(session.pending_click_y(), None);
    }

    #[test]
    fn toggle_to_expanded_keeps_selection_visible() {
        let mut session = NavigationSession::new(COMPACT);
        session.reconcile(8, 25);

        let scroll = session.set_row_display(RowDisplay::Expanded, 8, 25).unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(5, 8));
        assert!(scroll.window.contains(8));
        assert!((scroll.offset - 5.0 * 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_back_to_compact_keeps_top_row() {
        let mut session = NavigationSession::new(RowDisplay::Expanded);
        session.reconcile(5, 25);
        session.reconcile(4, 25);
        assert_eq!(session.window(), ViewportWindow::new(2, 5));

        let scroll = session.set_row_display(COMPACT, 4, 25).unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(2, 12));
    }

    #[test]
    fn toggle_to_compact_keeps_bottom_edge_selection_at_bottom() {
        let mut session = NavigationSession::new(RowDisplay::Expanded);
        session.reconcile(15, 25);
        assert_eq!(session.window(), ViewportWindow::new(12, 15));

        let scroll = session.set_row_display(COMPACT, 15, 25).unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(5, 15));
        assert!((scroll.offset - 5.0 * 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_near_top_fills_from_zero() {
        let mut session = NavigationSession::new(RowDisplay::Expanded);
        session.reconcile(6, 25);
        assert_eq!(session.window(), ViewportWindow::new(3, 6));

        let scroll = session.set_row_display(COMPACT, 6, 25).unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(0, 10));
    }
}
