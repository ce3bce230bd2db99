//! Panel session state.
//!
//! [`AppState`] is the single owner of everything the navigation core
//! mutates: the item store, the search state and its debouncer, the
//! selection, the viewport session and the mode flags. Only the event
//! handler writes to it, one event at a time.
//!
//! # Lifecycle
//!
//! Everything except the committed settings is session state. It is reset
//! when a panel opens for a new context and when the panel is dismissed;
//! [`AppState::reset_session`] is the one place that does it.

use super::modes::InputMode;
use super::notify::Notifier;
use super::selection::SelectionState;
use super::store::ItemStore;
use super::window::{NavigationSession, ScrollTo};
use crate::domain::{Context, Item};
use crate::search::{Debouncer, SearchState, SEARCH_DEBOUNCE};
use crate::settings::{BookmarkForm, Platform, Settings, ValidationError};
use crate::ui::helpers::{highlight_ranges, truncate};
use crate::ui::viewmodel::{
    BookmarkFormView, EmptyState, HeaderInfo, PanelViewModel, RowView, SearchBarInfo, WebSearchInfo,
};

/// Central state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Last validated settings.
    pub settings: Settings,

    /// Naming convention used when normalizing key presses.
    pub platform: Platform,

    /// Active context; `None` while the panel is hidden.
    pub context: Context,

    /// Context to return to when the settings editor closes.
    pub previous_context: Context,

    pub store: ItemStore,

    /// Query and mode the filtered view was computed with.
    pub search: SearchState,

    /// Text currently in the search box; becomes `search.query` once it
    /// has been stable for the debounce interval.
    pub query_input: String,

    pub pending_query: Debouncer<String>,

    pub selection: SelectionState,

    pub navigation: NavigationSession,

    pub input_mode: InputMode,

    /// Selected row of the web-search engine list.
    pub web_search_index: usize,

    /// `true` between `ShowPanel` and the matching `ItemsLoaded`.
    pub loading: bool,

    pub notifier: Notifier,

    /// Itemized errors of the last rejected settings change.
    pub validation_errors: Vec<ValidationError>,

    /// Bookmark edit form, open while `input_mode` is `Editing`.
    pub bookmark_form: Option<BookmarkForm>,

    pub form_errors: Vec<ValidationError>,
}

impl AppState {
    /// Fresh, hidden panel with committed `settings`.
    #[must_use]
    pub fn new(settings: Settings, platform: Platform) -> Self {
        let navigation = NavigationSession::new(settings.row_display);
        Self {
            settings,
            platform,
            context: Context::None,
            previous_context: Context::None,
            store: ItemStore::default(),
            search: SearchState::default(),
            query_input: String::new(),
            pending_query: Debouncer::new(SEARCH_DEBOUNCE),
            selection: SelectionState::default(),
            navigation,
            input_mode: InputMode::List,
            web_search_index: 0,
            loading: false,
            notifier: Notifier::default(),
            validation_errors: Vec::new(),
            bookmark_form: None,
            form_errors: Vec::new(),
        }
    }

    /// Drops all session state and returns to the hidden `None` context.
    ///
    /// Committed settings and the current notification survive.
    pub fn reset_session(&mut self) {
        tracing::debug!(context = ?self.context, "resetting panel session");

        self.context = Context::None;
        self.previous_context = Context::None;
        self.store.clear();
        self.search = SearchState::default();
        self.query_input.clear();
        self.pending_query.cancel();
        self.selection.reset();
        self.navigation = NavigationSession::new(self.settings.row_display);
        self.input_mode = InputMode::List;
        self.web_search_index = 0;
        self.loading = false;
        self.validation_errors.clear();
        self.bookmark_form = None;
        self.form_errors.clear();
    }

    /// Rows in the filtered view.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    /// Item under the selection, `None` for an empty list or a stale index.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        self.store.get(self.selection.selected_index())
    }

    /// Whether the selected item was closed or deleted this session.
    #[must_use]
    pub fn selected_is_closed(&self) -> bool {
        self.selected_item()
            .is_some_and(|item| self.selection.is_closed(&item.closed_key()))
    }

    /// Web-search mode: toggled on explicitly, or implied by an empty list.
    #[must_use]
    pub fn in_web_search(&self) -> bool {
        self.input_mode == InputMode::WebSearch || self.store.is_empty()
    }

    /// Url for the selected search engine and the current query.
    ///
    /// Spaces in the query become `+`.
    #[must_use]
    pub fn web_search_url(&self) -> Option<String> {
        let engine = self.settings.web_search_engine_urls.get(self.web_search_index)?;
        let query = self.query_input.trim().replace(' ', "+");
        Some(format!("{engine}{query}"))
    }

    /// Re-runs the search over the full list.
    ///
    /// The selection goes back to the first row and the viewport to the top,
    /// since row positions no longer mean what they did.
    pub fn apply_search_filter(&mut self) {
        let _span = tracing::debug_span!(
            "apply_search_filter",
            total_items = self.store.items().len(),
            query_len = self.search.query.len(),
            mode = ?self.search.mode
        )
        .entered();

        self.store.refilter(self.context, &self.search);
        self.selection.rewind();
        self.navigation.reset();

        tracing::debug!(filtered_count = self.store.len(), "search filter applied");
    }

    /// Moves the selection one row down and repositions the viewport.
    pub fn move_selection_down(&mut self) -> Option<ScrollTo> {
        let n = self.item_count();
        self.selection.next(n);
        self.navigation.reconcile(self.selection.selected_index(), n)
    }

    /// Moves the selection one row up and repositions the viewport.
    pub fn move_selection_up(&mut self) -> Option<ScrollTo> {
        let n = self.item_count();
        self.selection.previous(n);
        self.navigation.reconcile(self.selection.selected_index(), n)
    }

    /// Selects the clicked row, keeping it under the pointer.
    pub fn click_row(&mut self, index: usize, click_y: f64) -> Option<ScrollTo> {
        let n = self.item_count();
        if index >= n {
            tracing::debug!(index, item_count = n, "click outside the list ignored");
            return None;
        }
        self.selection.select_at(index, n);
        self.navigation.record_click(click_y);
        self.navigation.reconcile(index, n)
    }

    /// Jumps the selection to `index` without a click position, so the
    /// keyboard rules place the window.
    pub fn select_row(&mut self, index: usize) -> Option<ScrollTo> {
        let n = self.item_count();
        self.selection.select_at(index, n);
        self.navigation.reconcile(self.selection.selected_index(), n)
    }

    /// Steps through the search engine list, wrapping at both ends.
    pub fn cycle_web_search(&mut self, forward: bool) {
        let count = self.settings.web_search_engine_urls.len();
        if count == 0 {
            self.web_search_index = 0;
            return;
        }
        self.web_search_index = if forward {
            (self.web_search_index + 1) % count
        } else {
            (self.web_search_index % count + count - 1) % count
        };
    }
}

/// Characters of a row title kept in the view model.
const MAX_TITLE_CHARS: usize = 120;

impl AppState {
    /// Computes the view model for the presentation layer.
    ///
    /// # Parameters
    ///
    /// * `now_ms` - Wall-clock time in milliseconds since the Unix epoch,
    ///   used for the "visited ago" text of history rows
    #[must_use]
    pub fn compute_viewmodel(&self, now_ms: u64) -> PanelViewModel {
        let window = self.navigation.window();
        let total_rows = self.item_count();
        let selected = self.selection.selected_index();

        let rows: Vec<RowView> = if self.input_mode == InputMode::WebSearch {
            vec![]
        } else {
            self.store
                .filtered()
                .iter()
                .enumerate()
                .skip(window.first)
                .take(window.len())
                .map(|(index, item)| self.compute_row(index, item, selected, now_ms))
                .collect()
        };

        PanelViewModel {
            context: self.context,
            header: HeaderInfo {
                title: self.context.title().to_string(),
                count: total_rows,
                loading: self.loading,
            },
            search_bar: SearchBarInfo {
                query: self.query_input.clone(),
                mode: self.search.mode,
            },
            rows,
            total_rows,
            selected_index: selected,
            viewport: window,
            row_display: self.navigation.row_display(),
            web_search: self.compute_web_search(),
            empty_state: self.compute_empty_state(),
            notification: self.notifier.current().cloned(),
            validation_errors: self.validation_errors.clone(),
            bookmark_form: self.bookmark_form.as_ref().map(|form| BookmarkFormView {
                form: form.clone(),
                errors: self.form_errors.clone(),
            }),
            theme: self.settings.theme,
            show_favicons: self.settings.show_favicons,
        }
    }

    fn compute_row(&self, index: usize, item: &Item, selected: usize, now_ms: u64) -> RowView {
        let detail = match item {
            Item::Tab(tab) => tab.domain.clone(),
            Item::Bookmark(bookmark) => bookmark.parent.clone(),
            Item::History(entry) => format!("{} · {} visits", entry.visited_ago(now_ms), entry.vc),
        };

        RowView {
            index,
            title: truncate(item.title(), MAX_TITLE_CHARS),
            url: item.url().to_string(),
            detail,
            is_selected: index == selected,
            is_closed: self.selection.is_closed(&item.closed_key()),
            highlight_ranges: highlight_ranges(item.title(), &self.search.query, self.search.mode),
        }
    }

    fn compute_web_search(&self) -> Option<WebSearchInfo> {
        if !self.context.is_list() || self.loading || !self.in_web_search() {
            return None;
        }
        Some(WebSearchInfo {
            engines: self.settings.web_search_engine_urls.clone(),
            selected_index: self.web_search_index,
            target: self.web_search_url(),
        })
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.context.is_list() || self.loading || !self.store.is_empty() {
            return None;
        }

        let (message, subtitle) = if self.search.query.trim().is_empty() {
            (
                format!("No {} found", self.context.title().to_lowercase()),
                "Type a query and press Enter to search the web".to_string(),
            )
        } else {
            (
                format!("No match for \"{}\"", self.search.query.trim()),
                "Press Enter to search the web instead".to_string(),
            )
        };

        Some(EmptyState { message, subtitle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::window::ViewportWindow;
    use crate::domain::TabItem;

    fn tabs(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| {
                Item::Tab(TabItem {
                    id: i.to_string(),
                    window_id: "1".to_string(),
                    title: format!("tab {i}"),
                    url: format!("https://site{i}.test"),
                    ..TabItem::default()
                })
            })
            .collect()
    }

    fn state_with(n: usize) -> AppState {
        let mut state = AppState::new(Settings::default(), Platform::Other);
        state.context = Context::Tabs;
        state.store.replace(tabs(n));
        state
    }

    #[test]
    fn stepping_down_scrolls_past_the_window() {
        let mut state = state_with(25);
        for _ in 0..10 {
            assert_eq!(state.move_selection_down(), None);
        }
        let scroll = state.move_selection_down().unwrap();
        assert_eq!(scroll.window, ViewportWindow::new(1, 11));
        assert_eq!(state.selection.selected_index(), 11);
    }

    #[test]
    fn stepping_up_from_top_wraps_to_the_end() {
        let mut state = state_with(25);
        let scroll = state.move_selection_up().unwrap();
        assert_eq!(state.selection.selected_index(), 24);
        assert_eq!(scroll.window, ViewportWindow::new(14, 24));
    }

    #[test]
    fn click_outside_list_is_ignored() {
        let mut state = state_with(3);
        assert_eq!(state.click_row(5, 10.0), None);
        assert_eq!(state.selection.selected_index(), 0);
        assert_eq!(state.navigation.pending_click_y(), None);
    }

    #[test]
    fn web_search_url_joins_query_words() {
        let mut state = state_with(0);
        state.query_input = " rust borrow checker ".to_string();
        state.cycle_web_search(true);

        assert!(state.in_web_search());
        assert_eq!(
            state.web_search_url().as_deref(),
            Some("https://www.duckduckgo.com?q=rust+borrow+checker")
        );

        state.cycle_web_search(false);
        state.cycle_web_search(false);
        assert_eq!(state.web_search_index, 2);
    }

    #[test]
    fn filter_rewinds_selection_and_window() {
        let mut state = state_with(25);
        for _ in 0..15 {
            state.move_selection_down();
        }
        state.selection.mark_closed("1:3");

        state.search.query = "tab 1".to_string();
        state.apply_search_filter();

        assert_eq!(state.selection.selected_index(), 0);
        assert_eq!(state.navigation.window(), ViewportWindow::new(0, 10));
        assert!(state.selection.is_closed("1:3"));
        // "tab 1" and "tab 10".."tab 19"
        assert_eq!(state.item_count(), 11);
    }

    #[test]
    fn reset_clears_session_but_keeps_settings() {
        let mut state = state_with(5);
        state.settings.web_browser = "librewolf".to_string();
        state.selection.mark_closed("1:0");
        state.query_input = "abc".to_string();

        state.reset_session();

        assert_eq!(state.context, Context::None);
        assert_eq!(state.item_count(), 0);
        assert!(state.selection.closed_ids().is_empty());
        assert!(state.query_input.is_empty());
        assert_eq!(state.settings.web_browser, "librewolf");
    }

    #[test]
    fn viewmodel_holds_only_the_window_rows() {
        let mut state = state_with(25);
        state.loading = false;
        for _ in 0..12 {
            state.move_selection_down();
        }
        state.selection.mark_closed("1:5");

        let vm = state.compute_viewmodel(0);

        assert_eq!(vm.total_rows, 25);
        assert_eq!(vm.viewport, ViewportWindow::new(2, 12));
        assert_eq!(vm.rows.len(), 11);
        assert_eq!(vm.rows[0].index, 2);
        assert!(vm.rows[3].is_closed);
        assert!(vm.rows[10].is_selected);
        assert_eq!(vm.header.title, "Tabs");
        assert!(vm.empty_state.is_none());
        assert!(vm.web_search.is_none());
    }

    #[test]
    fn viewmodel_offers_web_search_for_empty_results() {
        let mut state = state_with(3);
        state.search.query = "zzz".to_string();
        state.query_input = "zzz".to_string();
        state.apply_search_filter();

        let vm = state.compute_viewmodel(0);

        assert!(vm.rows.is_empty());
        assert_eq!(vm.empty_state.map(|e| e.message), Some("No match for \"zzz\"".to_string()));
        let web = vm.web_search.unwrap();
        assert_eq!(web.target.as_deref(), Some("https://www.google.com?q=zzz"));
    }

    #[test]
    fn viewmodel_serializes_to_json() {
        let state = state_with(2);
        let json = serde_json::to_value(state.compute_viewmodel(0)).unwrap();
        assert_eq!(json["context"], "tabs");
        assert_eq!(json["rows"][1]["title"], "tab 1");
        assert_eq!(json["viewport"]["last"], 10);
    }
}
