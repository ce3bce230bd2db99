//! View model types representing renderable panel state.
//!
//! View models are immutable snapshots computed from
//! [`AppState`](crate::app::AppState) after every render-worthy event. They
//! carry exactly the render inputs the presentation layer needs: the rows of
//! the current viewport window, the selection, the closed rows and the
//! scroll window, plus the chrome around the list.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel(now_ms) → PanelViewModel → JSON → presentation
//! ```
//!
//! Only the rows inside the viewport window are materialized; `total_rows`
//! and the window bounds let the presentation layer size its scroll area.

use crate::app::modes::RowDisplay;
use crate::app::notify::Notification;
use crate::app::window::ViewportWindow;
use crate::domain::Context;
use crate::search::SearchMode;
use crate::settings::{BookmarkForm, Theme, ValidationError};
use serde::Serialize;

/// Complete panel view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelViewModel {
    pub context: Context,
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,

    /// Rows of the viewport window, top to bottom.
    pub rows: Vec<RowView>,

    /// Number of rows in the filtered list.
    pub total_rows: usize,

    /// Absolute index of the selected row.
    pub selected_index: usize,

    pub viewport: ViewportWindow,
    pub row_display: RowDisplay,

    /// Present while web-search mode replaces the list.
    pub web_search: Option<WebSearchInfo>,

    pub empty_state: Option<EmptyState>,
    pub notification: Option<Notification>,

    /// Itemized settings errors; non-empty only while they block input.
    pub validation_errors: Vec<ValidationError>,

    pub bookmark_form: Option<BookmarkFormView>,
    pub theme: Theme,
    pub show_favicons: bool,
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Absolute index in the filtered list.
    pub index: usize,
    pub title: String,
    pub url: String,

    /// Secondary line: domain for tabs, folder for bookmarks, last visit for history.
    pub detail: String,
    pub is_selected: bool,

    /// Closed or deleted earlier in this session.
    pub is_closed: bool,

    /// Character ranges of `title` matched by the query.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    pub title: String,
    pub count: usize,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchBarInfo {
    /// Text in the search box, which may be ahead of the applied query.
    pub query: String,
    pub mode: SearchMode,
}

/// Search engine list shown in web-search mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebSearchInfo {
    pub engines: Vec<String>,
    pub selected_index: usize,

    /// Url Enter would open.
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkFormView {
    pub form: BookmarkForm,
    pub errors: Vec<ValidationError>,
}
