//! End-to-end checks of the navigation core through its public API.

use std::time::{Duration, Instant};
use tabsift::app::{handle_event, Action, AppState, Event, NavigationSession, SelectionState, ViewportWindow};
use tabsift::domain::{BookmarkItem, Context, HistoryItem, Item, TabItem};
use tabsift::search::{filter, SearchMode};
use tabsift::settings::{BindingKey, KeyPress, Platform, Settings};
use tabsift::shortcuts::{reconcile, MemoryHotkeys, ShortcutManager};
use tabsift::worker::WorkerResponse;
use tabsift::RowDisplay;

fn tab(id: usize) -> Item {
    Item::Tab(TabItem {
        id: id.to_string(),
        window_id: "1".to_string(),
        title: format!("Tab number {id}"),
        url: format!("https://example{id}.org/page"),
        domain: format!("example{id}.org"),
        ..TabItem::default()
    })
}

fn mixed_items() -> Vec<Item> {
    vec![
        Item::History(HistoryItem {
            id: "a".to_string(),
            title: "GitHub - tokio-rs/tokio".to_string(),
            url: "https://github.com/tokio-rs/tokio".to_string(),
            ..HistoryItem::default()
        }),
        Item::History(HistoryItem {
            id: "b".to_string(),
            title: "The Rust Programming Language".to_string(),
            url: "https://doc.rust-lang.org/book/".to_string(),
            ..HistoryItem::default()
        }),
        Item::History(HistoryItem {
            id: "c".to_string(),
            title: "gitoxide".to_string(),
            url: "https://crates.io/crates/gix".to_string(),
            ..HistoryItem::default()
        }),
    ]
}

fn open_tabs(n: usize, now: Instant) -> AppState {
    let mut state = AppState::new(Settings::default(), Platform::Other);
    handle_event(&mut state, &Event::ShowPanel(Context::Tabs), now).unwrap();
    handle_event(
        &mut state,
        &Event::WorkerResponse(WorkerResponse::ItemsLoaded {
            context: Context::Tabs,
            items: (0..n).map(tab).collect(),
            elapsed_ms: 5,
        }),
        now,
    )
    .unwrap();
    state
}

#[test]
fn empty_query_is_identity() {
    let items = mixed_items();
    for mode in [SearchMode::Exact, SearchMode::Fuzzy] {
        assert_eq!(filter(&items, Context::History, "", mode), items);
        assert_eq!(filter(&items, Context::History, "   ", mode), items);
    }
    assert!(filter(&[], Context::Tabs, "", SearchMode::Fuzzy).is_empty());
}

#[test]
fn fuzzy_keeps_every_exact_match() {
    let items = mixed_items();
    for query in ["git", "RUST", "tokio", "crates", "book"] {
        let exact = filter(&items, Context::History, query, SearchMode::Exact);
        let fuzzy = filter(&items, Context::History, query, SearchMode::Fuzzy);

        assert!(!exact.is_empty(), "{query}");
        assert!(fuzzy.len() >= exact.len(), "{query}");
        for item in &exact {
            assert!(fuzzy.contains(item), "{query}: {}", item.title());
        }
    }
}

#[test]
fn bookmark_search_looks_at_folder() {
    let items = vec![Item::Bookmark(BookmarkItem {
        id: "1".to_string(),
        title: "Axum".to_string(),
        url: "https://docs.rs/axum".to_string(),
        parent: "/Toolbar/web/".to_string(),
    })];
    assert_eq!(filter(&items, Context::Bookmarks, "toolbar", SearchMode::Exact).len(), 1);
    assert!(filter(&items, Context::History, "toolbar", SearchMode::Exact).is_empty());
}

#[test]
fn selection_is_cyclic() {
    for n in 1..=12 {
        let mut selection = SelectionState::default();
        selection.select_at(n / 2, n);
        for _ in 0..n {
            selection.next(n);
        }
        assert_eq!(selection.selected_index(), n / 2);
        for _ in 0..n {
            selection.previous(n);
        }
        assert_eq!(selection.selected_index(), n / 2);
    }
}

#[test]
fn list_down_from_bottom_edge_slides_window() {
    let now = Instant::now();
    let mut state = open_tabs(25, now);
    let down = Event::Key(KeyPress::plain("ArrowDown"));

    for _ in 0..10 {
        handle_event(&mut state, &down, now).unwrap();
    }
    assert_eq!(state.selection.selected_index(), 10);
    assert_eq!(state.navigation.window(), ViewportWindow::new(0, 10));

    let (_, actions) = handle_event(&mut state, &down, now).unwrap();

    assert_eq!(state.selection.selected_index(), 11);
    assert_eq!(state.navigation.window(), ViewportWindow::new(1, 11));
    assert!(matches!(
        actions.as_slice(),
        [Action::ScrollTo(scroll)] if scroll.window == ViewportWindow::new(1, 11)
    ));
}

#[test]
fn click_keeps_clicked_slot_in_place() {
    let mut session = NavigationSession::new(RowDisplay::Compact);
    // bring the window to [5, 15]
    session.reconcile(15, 20);
    assert_eq!(session.window(), ViewportWindow::new(5, 15));

    let mut selection = SelectionState::default();
    selection.select_at(7, 20);

    // third slot of a compact row class
    let slot_y = RowDisplay::Compact.row_height() * 2.5;
    session.record_click(slot_y);
    let scroll = session.reconcile(selection.selected_index(), 20);

    assert_eq!(scroll, None);
    assert_eq!(session.window(), ViewportWindow::new(5, 15));
}

#[test]
fn query_burst_filters_once() {
    let now = Instant::now();
    let mut state = AppState::new(Settings::default(), Platform::Other);
    handle_event(&mut state, &Event::ShowPanel(Context::History), now).unwrap();
    handle_event(
        &mut state,
        &Event::WorkerResponse(WorkerResponse::ItemsLoaded {
            context: Context::History,
            items: mixed_items(),
            elapsed_ms: 1,
        }),
        now,
    )
    .unwrap();

    let keystrokes = [("g", 0), ("gi", 75), ("git", 150)];
    for (query, at) in keystrokes {
        handle_event(&mut state, &Event::QueryChanged(query.to_string()), now + Duration::from_millis(at)).unwrap();
    }

    let mut evaluations = 0;
    for ms in (150..=500).step_by(10) {
        let (_, actions) = handle_event(&mut state, &Event::Tick, now + Duration::from_millis(ms)).unwrap();
        if !actions.is_empty() {
            evaluations += 1;
            assert_eq!(ms, 350, "fired 200ms after the last keystroke");
        }
    }

    assert_eq!(evaluations, 1);
    assert_eq!(state.search.query, "git");
    assert_eq!(state.item_count(), 2);
}

#[tokio::test]
async fn rebinding_list_down_registers_then_idles() {
    let hotkeys = MemoryHotkeys::new();

    let mut previous = Settings::default().shortcuts;
    previous.shortcut_list_down = "ArrowDown".to_string();
    let mut next = previous.clone();
    next.shortcut_list_down = "Control+j".to_string();

    let previous = previous.bindings();
    let next = next.bindings();

    reconcile(None, &previous, &hotkeys).await;
    assert!(hotkeys.is_registered_now("ArrowDown"));

    let report = reconcile(Some(&previous), &next, &hotkeys).await;
    assert_eq!(report.registered, vec![(BindingKey::ListDown, "Control+j".to_string())]);
    assert_eq!(report.unregistered, vec![(BindingKey::ListDown, "ArrowDown".to_string())]);
    assert!(hotkeys.is_registered_now("Control+j"));
    assert!(!hotkeys.is_registered_now("ArrowDown"));

    let registers = hotkeys.register_calls();
    let unregisters = hotkeys.unregister_calls();
    let again = reconcile(Some(&previous), &next, &hotkeys).await;

    assert!(again.is_noop());
    assert_eq!(hotkeys.register_calls(), registers);
    assert_eq!(hotkeys.unregister_calls(), unregisters);
}

#[tokio::test]
async fn manager_applies_settings_changes() {
    let mut manager = ShortcutManager::new(MemoryHotkeys::new());
    let settings = Settings::default();

    let first = manager.apply(settings.shortcuts.global_bindings()).await;
    assert_eq!(first.registered.len(), 2);

    let now = Instant::now();
    let mut state = AppState::new(settings.clone(), Platform::Other);
    let mut changed = settings;
    changed.shortcuts.global_shortcut_show_panel_tabs = "Control+Shift+t".to_string();

    let (_, actions) = handle_event(&mut state, &Event::SettingsChanged(changed), now).unwrap();
    let Some(Action::ApplyShortcuts(bindings)) = actions.into_iter().next() else {
        panic!("expected a shortcut reconciliation");
    };

    let report = manager.apply(bindings).await;
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.unregistered.len(), 1);
    assert_eq!(manager.hotkeys().pressed("control+shift+t"), Some(BindingKey::ShowPanelTabs));
    assert_eq!(manager.hotkeys().pressed("Control+;"), None);
}
