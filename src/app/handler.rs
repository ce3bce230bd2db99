//! Event handling and state transition logic.
//!
//! This module is the navigation dispatcher: every input the panel receives
//! (key presses, clicks, query edits, timer ticks, worker completions,
//! settings changes) arrives as an [`Event`] and goes through
//! [`handle_event`], which mutates [`AppState`] and returns the side effects
//! to run.
//!
//! # Architecture
//!
//! ```text
//! Driver Input → Event → handle_event → State Mutations → Actions → Driver
//!                            ↑                                 ↓
//!                            └────── Worker Responses ─────────┘
//! ```
//!
//! # Key routing
//!
//! A key press is matched against the configured bindings in a fixed order;
//! the first rule that applies wins:
//!
//! 1. `close_panel` resets the session and hides the window
//! 2. while settings errors are shown, Enter acknowledges them
//! 3. `edit_bookmark` toggles the edit form (Tabs and Bookmarks only)
//! 4. `list_down` / `list_up` move the selection, or cycle the search engine
//!    in web-search mode
//! 5. Enter in web-search mode opens the selected engine with the query
//! 6. context actions: Enter opens or switches, `close_item` closes or
//!    deletes, `copy_selected_item_url` copies
//!
//! Rows in the closed set are never acted on again, and every item lookup is
//! guarded so a stale index is a no-op rather than an error.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use tabsift::app::{handle_event, Action, AppState, Event};
//! use tabsift::domain::Context;
//! use tabsift::settings::{Platform, Settings};
//!
//! let mut state = AppState::new(Settings::default(), Platform::Other);
//! let (render, actions) = handle_event(&mut state, &Event::ShowPanel(Context::Tabs), Instant::now())?;
//!
//! assert!(render);
//! assert_eq!(actions[0], Action::ShowWindow);
//! # Ok::<(), tabsift::TabsiftError>(())
//! ```

use super::modes::InputMode;
use super::window::ScrollTo;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{Context, Item};
use crate::settings::{validate_bookmark, validate_settings, BindingKey, BookmarkForm, KeyPress, Settings};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::time::Instant;

/// Inputs to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Opens the panel on `context` with a fresh session.
    ShowPanel(Context),

    /// A registered global hotkey fired.
    GlobalShortcut(BindingKey),

    /// Hides the panel and drops the session.
    ClosePanel,

    /// A key press inside the panel.
    Key(KeyPress),

    /// The search box now holds this text.
    QueryChanged(String),

    /// Flips between exact and fuzzy matching.
    ToggleSearchMode,

    /// Flips between compact and expanded rows.
    ToggleRowDisplay,

    /// Enters or leaves web-search mode.
    ToggleWebSearch,

    /// Mouse click on row `index`, `y` pixels below the top of the viewport.
    Click {
        index: usize,
        y: f64,
    },

    /// Double click on row `index`: select it and run the Enter action.
    Activate {
        index: usize,
    },

    /// Timer tick; fires a due debounced search and expires notifications.
    Tick,

    OpenSettings,

    CloseSettings,

    /// A complete edited settings value, committed only if it validates.
    SettingsChanged(Settings),

    /// Dismisses the settings error list.
    AcknowledgeErrors,

    /// Bookmark edit form submitted.
    SubmitBookmark(BookmarkForm),

    /// Completion of an earlier [`Action::PostToWorker`] request.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Panel state, the only thing this function writes to
/// * `event` - Event to process
/// * `now` - Current time; debounce and notification deadlines are
///   measured against it
///
/// # Returns
///
/// `(render, actions)`: whether the view model changed, and the side effects
/// to run in order.
///
/// # Errors
///
/// None of the current transitions fail; the `Result` keeps the signature
/// stable for the driver.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event, now: Instant) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event, context = ?state.context).entered();

    match event {
        Event::ShowPanel(context) => Ok(show_panel(state, *context)),
        Event::GlobalShortcut(key) => {
            let Some(context) = panel_context(*key) else {
                tracing::debug!(key = %key, "ignoring non-global shortcut");
                return Ok((false, vec![]));
            };
            Ok(show_panel(state, context))
        }
        Event::ClosePanel => Ok(close_panel(state)),
        Event::Key(press) => Ok(handle_key(state, press)),
        Event::QueryChanged(query) => {
            if !state.context.is_list() {
                return Ok((false, vec![]));
            }
            state.query_input.clone_from(query);
            state.pending_query.schedule(query.clone(), now);
            tracing::trace!(query = %query, "search scheduled");
            Ok((true, vec![]))
        }
        Event::ToggleSearchMode => {
            state.search.mode = state.search.mode.toggled();
            tracing::debug!(mode = ?state.search.mode, "search mode toggled");
            if !state.context.is_list() {
                return Ok((true, vec![]));
            }
            // bypasses the debounce with the text currently in the search box
            state.pending_query.cancel();
            state.search.query.clone_from(&state.query_input);
            state.apply_search_filter();
            Ok((true, vec![scroll_to_top(state)]))
        }
        Event::ToggleRowDisplay => {
            let display = state.navigation.row_display().toggled();
            state.settings.row_display = display;
            let scroll = state.navigation.set_row_display(
                display,
                state.selection.selected_index(),
                state.item_count(),
            );
            Ok((true, scroll.map(Action::ScrollTo).into_iter().collect()))
        }
        Event::ToggleWebSearch => {
            if !state.context.is_list() || state.input_mode == InputMode::Editing {
                return Ok((false, vec![]));
            }
            state.input_mode = if state.input_mode == InputMode::WebSearch {
                InputMode::List
            } else {
                InputMode::WebSearch
            };
            Ok((true, vec![]))
        }
        Event::Click { index, y } => {
            if !state.context.is_list() || state.input_mode == InputMode::Editing {
                return Ok((false, vec![]));
            }
            if state.in_web_search() {
                return Ok((select_engine(state, *index), vec![]));
            }
            let scroll = state.click_row(*index, *y);
            Ok((true, scroll.map(Action::ScrollTo).into_iter().collect()))
        }
        Event::Activate { index } => {
            if !state.context.is_list() || state.input_mode == InputMode::Editing {
                return Ok((false, vec![]));
            }
            if state.in_web_search() {
                if !select_engine(state, *index) {
                    return Ok((false, vec![]));
                }
                return Ok(open_web_search(state));
            }
            if *index >= state.item_count() {
                return Ok((false, vec![]));
            }
            let scroll = state.select_row(*index);
            let (render, actions) = enter_action(state);
            if actions.is_empty() {
                // refused, but the selection still moved
                return Ok((true, scroll.map(Action::ScrollTo).into_iter().collect()));
            }
            Ok((render, actions))
        }
        Event::Tick => {
            let mut changed = false;
            let mut actions = vec![];

            if let Some(query) = state.pending_query.poll(now) {
                tracing::debug!(query = %query, "debounced search fired");
                state.search.query = query;
                state.apply_search_filter();
                actions.push(scroll_to_top(state));
                changed = true;
            }

            changed |= state.notifier.tick(now);
            Ok((changed, actions))
        }
        Event::OpenSettings => {
            if state.context != Context::Settings {
                state.previous_context = state.context;
            }
            state.context = Context::Settings;
            state.input_mode = InputMode::List;
            state.bookmark_form = None;
            state.selection.rewind();
            Ok((true, vec![Action::ShowWindow]))
        }
        Event::CloseSettings => {
            if state.context != Context::Settings {
                return Ok((false, vec![]));
            }
            state.context = state.previous_context;
            state.input_mode = InputMode::List;
            state.validation_errors.clear();
            state.selection.rewind();
            state.navigation.reset();

            if state.context == Context::None {
                return Ok((true, vec![Action::HideWindow]));
            }
            Ok((true, vec![scroll_to_top(state)]))
        }
        Event::SettingsChanged(settings) => Ok(apply_settings(state, settings)),
        Event::AcknowledgeErrors => Ok(acknowledge_errors(state)),
        Event::SubmitBookmark(form) => Ok(submit_bookmark(state, form)),
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response, now)),
    }
}

const fn panel_context(key: BindingKey) -> Option<Context> {
    match key {
        BindingKey::ShowPanelTabs => Some(Context::Tabs),
        BindingKey::ShowPanelBookmarks => Some(Context::Bookmarks),
        BindingKey::ShowPanelRecentlyClosed => Some(Context::RecentlyClosed),
        BindingKey::ShowPanelHistory => Some(Context::History),
        _ => None,
    }
}

fn show_panel(state: &mut AppState, context: Context) -> (bool, Vec<Action>) {
    if !context.is_list() {
        tracing::debug!(context = ?context, "not a list context, panel stays as is");
        return (false, vec![]);
    }

    state.reset_session();
    state.context = context;
    state.loading = true;

    tracing::debug!(context = ?context, "panel opened");

    (
        true,
        vec![
            Action::ShowWindow,
            Action::PostToWorker(WorkerMessage::fetch_items(context)),
        ],
    )
}

fn close_panel(state: &mut AppState) -> (bool, Vec<Action>) {
    state.reset_session();
    (true, vec![Action::HideWindow])
}

fn scroll_to_top(state: &AppState) -> Action {
    Action::ScrollTo(ScrollTo {
        offset: 0.0,
        window: state.navigation.window(),
    })
}

fn handle_key(state: &mut AppState, press: &KeyPress) -> (bool, Vec<Action>) {
    let platform = state.platform;
    let shortcuts = &state.settings.shortcuts;
    let bound = |key: BindingKey| press.matches(shortcuts.get(key), platform);

    let close_panel_pressed = bound(BindingKey::ClosePanel);
    let edit_pressed = bound(BindingKey::EditBookmark);
    let down_pressed = bound(BindingKey::ListDown);
    let up_pressed = bound(BindingKey::ListUp);
    let close_item_pressed = bound(BindingKey::CloseItem);
    let copy_pressed = bound(BindingKey::CopySelectedItemUrl);

    tracing::trace!(combination = %press.combination(platform), "key pressed");

    if close_panel_pressed {
        return close_panel(state);
    }

    if state.input_mode == InputMode::ShowingErrors {
        if press.is_enter() {
            return acknowledge_errors(state);
        }
        return (false, vec![]);
    }

    if !state.context.is_list() {
        return (false, vec![]);
    }

    let web_search = state.in_web_search();

    if edit_pressed && !web_search && matches!(state.context, Context::Tabs | Context::Bookmarks) {
        return toggle_edit_form(state);
    }

    if state.input_mode == InputMode::Editing {
        return (false, vec![]);
    }

    if down_pressed || up_pressed {
        if web_search {
            state.cycle_web_search(down_pressed);
            return (true, vec![]);
        }
        let scroll = if down_pressed {
            state.move_selection_down()
        } else {
            state.move_selection_up()
        };
        return (true, scroll.map(Action::ScrollTo).into_iter().collect());
    }

    if web_search {
        if press.is_enter() {
            return open_web_search(state);
        }
        return (false, vec![]);
    }

    if press.is_enter() {
        return enter_action(state);
    }
    if close_item_pressed {
        return close_item(state);
    }
    if copy_pressed {
        return copy_url(state);
    }

    (false, vec![])
}

fn open_web_search(state: &mut AppState) -> (bool, Vec<Action>) {
    let Some(url) = state.web_search_url() else {
        tracing::debug!(index = state.web_search_index, "no search engine at index");
        return (false, vec![]);
    };

    tracing::debug!(url = %url, "opening web search");
    let browser = state.settings.web_browser.clone();
    state.reset_session();

    (
        true,
        vec![
            Action::PostToWorker(WorkerMessage::open_url(url, browser)),
            Action::HideWindow,
        ],
    )
}

fn select_engine(state: &mut AppState, index: usize) -> bool {
    if index >= state.settings.web_search_engine_urls.len() {
        return false;
    }
    state.web_search_index = index;
    true
}

fn enter_action(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.selected_is_closed() {
        tracing::debug!("selected item is closed, ignoring");
        return (false, vec![]);
    }
    let Some(item) = state.selected_item() else {
        tracing::debug!(index = state.selection.selected_index(), "no item at selection");
        return (false, vec![]);
    };

    let browser = state.settings.web_browser.clone();
    let message = match (state.context, item) {
        (Context::Tabs, Item::Tab(_)) => WorkerMessage::switch_to_tab(item.action_id(), browser),
        (Context::Bookmarks | Context::History | Context::RecentlyClosed, _) => {
            WorkerMessage::open_url(item.url().to_string(), browser)
        }
        _ => {
            tracing::debug!(context = ?state.context, "item does not belong to the context");
            return (false, vec![]);
        }
    };

    state.reset_session();
    (true, vec![Action::PostToWorker(message), Action::HideWindow])
}

fn close_item(state: &mut AppState) -> (bool, Vec<Action>) {
    if !state.context.supports_close() || state.selected_is_closed() {
        return (false, vec![]);
    }
    let Some(item) = state.selected_item() else {
        return (false, vec![]);
    };

    let message = match item {
        Item::Tab(_) => WorkerMessage::close_tab(item.action_id()),
        Item::Bookmark(bookmark) => WorkerMessage::delete_bookmark(bookmark.id.clone()),
        Item::History(_) => return (false, vec![]),
    };

    (false, vec![Action::PostToWorker(message)])
}

fn copy_url(state: &AppState) -> (bool, Vec<Action>) {
    if !state.context.supports_copy() {
        return (false, vec![]);
    }
    let Some(item) = state.selected_item() else {
        return (false, vec![]);
    };
    (
        false,
        vec![Action::PostToWorker(WorkerMessage::copy_to_clipboard(
            item.url().to_string(),
        ))],
    )
}

fn toggle_edit_form(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.input_mode == InputMode::Editing {
        state.input_mode = InputMode::List;
        state.bookmark_form = None;
        state.form_errors.clear();
        return (true, vec![]);
    }

    if state.selected_is_closed() {
        return (false, vec![]);
    }
    let form = match state.selected_item() {
        Some(Item::Tab(tab)) => BookmarkForm {
            title: tab.title.clone(),
            url: tab.url.clone(),
            folder_path: String::new(),
        },
        Some(Item::Bookmark(bookmark)) => BookmarkForm {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            folder_path: bookmark.parent.clone(),
        },
        Some(Item::History(_)) | None => return (false, vec![]),
    };

    state.bookmark_form = Some(form);
    state.form_errors.clear();
    state.input_mode = InputMode::Editing;
    (true, vec![])
}

fn submit_bookmark(state: &mut AppState, form: &BookmarkForm) -> (bool, Vec<Action>) {
    if state.input_mode != InputMode::Editing {
        return (false, vec![]);
    }

    let errors = validate_bookmark(form);
    if !errors.is_empty() {
        tracing::debug!(error_count = errors.len(), "bookmark form rejected");
        state.bookmark_form = Some(form.clone());
        state.form_errors = errors;
        return (true, vec![]);
    }

    let message = match state.selected_item() {
        Some(Item::Bookmark(bookmark)) if state.context == Context::Bookmarks => {
            let id = bookmark.id.clone();
            state.store.update_bookmark(&id, form);
            WorkerMessage::update_bookmark(id, form.clone())
        }
        Some(Item::Tab(_)) if state.context == Context::Tabs => WorkerMessage::create_bookmark(form.clone()),
        _ => {
            tracing::debug!("no bookmarkable item selected");
            return (false, vec![]);
        }
    };

    state.input_mode = InputMode::List;
    state.bookmark_form = None;
    state.form_errors.clear();
    (true, vec![Action::PostToWorker(message)])
}

fn apply_settings(state: &mut AppState, settings: &Settings) -> (bool, Vec<Action>) {
    let errors = validate_settings(settings);
    if !errors.is_empty() {
        tracing::debug!(error_count = errors.len(), "settings change rejected");
        state.validation_errors = errors;
        state.input_mode = InputMode::ShowingErrors;
        return (true, vec![]);
    }

    let previous_globals = state.settings.shortcuts.global_bindings();
    let previous_display = state.settings.row_display;
    state.settings = settings.clone();
    state.validation_errors.clear();

    let mut actions = vec![];

    if settings.row_display != previous_display {
        let scroll = state.navigation.set_row_display(
            settings.row_display,
            state.selection.selected_index(),
            state.item_count(),
        );
        actions.extend(scroll.map(Action::ScrollTo));
    }

    let globals = settings.shortcuts.global_bindings();
    if globals != previous_globals {
        actions.push(Action::ApplyShortcuts(globals));
    }

    if state.web_search_index >= settings.web_search_engine_urls.len() {
        state.web_search_index = 0;
    }

    tracing::debug!(action_count = actions.len(), "settings committed");
    (true, actions)
}

fn acknowledge_errors(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.input_mode != InputMode::ShowingErrors {
        return (false, vec![]);
    }
    state.validation_errors.clear();
    state.input_mode = InputMode::List;
    (true, vec![])
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse, now: Instant) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::ItemsLoaded {
            context,
            items,
            elapsed_ms,
        } => {
            if *context != state.context {
                tracing::debug!(loaded = ?context, active = ?state.context, "discarding stale items");
                return (false, vec![]);
            }

            state.store.replace(items.clone());
            state.apply_search_filter();
            state.loading = false;
            state.notifier.notify(format!("took {elapsed_ms} ms !"), now);

            tracing::debug!(item_count = items.len(), elapsed_ms, "items loaded");
            (true, vec![])
        }
        WorkerResponse::TabClosed { id } => {
            state.selection.mark_closed(id.clone());
            state.notifier.notify("Tab closed !", now);
            (true, vec![])
        }
        WorkerResponse::BookmarkDeleted { id } => {
            state.selection.mark_closed(id.clone());
            state.notifier.notify("Bookmark deleted", now);
            (true, vec![])
        }
        WorkerResponse::Copied => {
            state.notifier.notify("Copied url", now);
            (true, vec![])
        }
        WorkerResponse::BookmarkSaved { id } => {
            let message = if id.is_some() { "Bookmark updated" } else { "Bookmark created" };
            state.notifier.notify(message, now);
            (true, vec![])
        }
        WorkerResponse::UrlOpened { .. } | WorkerResponse::TabSwitched { .. } => (false, vec![]),
        WorkerResponse::Error { operation, message } => {
            tracing::error!(operation = %operation, error = %message, "worker request failed");
            if operation == "fetch items" {
                state.loading = false;
            }
            state.notifier.notify(format!("{operation} failed: {message}"), now);
            (true, vec![])
        }
    }
}
