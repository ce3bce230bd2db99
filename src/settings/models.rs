//! Settings model and keyboard binding set.
//!
//! Settings are read from a TOML file whose keys mirror the field names below.
//! Every field has a default, so a partial (or empty) file is valid:
//!
//! ```toml
//! web_browser = "firefox"
//! row_display = "compact"
//!
//! [shortcuts]
//! global_shortcut_show_panel_tabs = "Control+;"
//! shortcut_list_down = "Control+j"
//! shortcut_list_up = "Control+k"
//! ```
//!
//! Shortcut values are normalized combinations (see [`super::keys`]) or `""`
//! for an inactive binding.

use super::keys::INACTIVE;
use crate::app::modes::RowDisplay;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color scheme preference handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Dark,
    Light,
}

/// Identifies one configurable shortcut.
///
/// The first four are global: they are registered with the OS hotkey service
/// and open the panel from anywhere. The rest are local to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BindingKey {
    ShowPanelTabs,
    ShowPanelBookmarks,
    ShowPanelRecentlyClosed,
    ShowPanelHistory,
    CopySelectedItemUrl,
    ClosePanel,
    CloseItem,
    ListDown,
    ListUp,
    EditBookmark,
}

impl BindingKey {
    pub const ALL: [Self; 10] = [
        Self::ShowPanelTabs,
        Self::ShowPanelBookmarks,
        Self::ShowPanelRecentlyClosed,
        Self::ShowPanelHistory,
        Self::CopySelectedItemUrl,
        Self::ClosePanel,
        Self::CloseItem,
        Self::ListDown,
        Self::ListUp,
        Self::EditBookmark,
    ];

    /// Whether the binding is registered with the OS hotkey service.
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(
            self,
            Self::ShowPanelTabs
                | Self::ShowPanelBookmarks
                | Self::ShowPanelRecentlyClosed
                | Self::ShowPanelHistory
        )
    }

    /// Key of the binding in the settings file.
    #[must_use]
    pub const fn setting_name(self) -> &'static str {
        match self {
            Self::ShowPanelTabs => "global_shortcut_show_panel_tabs",
            Self::ShowPanelBookmarks => "global_shortcut_show_panel_bookmarks",
            Self::ShowPanelRecentlyClosed => "global_shortcut_show_panel_recently_closed",
            Self::ShowPanelHistory => "global_shortcut_show_panel_history",
            Self::CopySelectedItemUrl => "shortcut_copy_selected_item_url",
            Self::ClosePanel => "shortcut_close_panel",
            Self::CloseItem => "shortcut_close_item",
            Self::ListDown => "shortcut_list_down",
            Self::ListUp => "shortcut_list_up",
            Self::EditBookmark => "shortcut_edit_bookmark",
        }
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.setting_name())
    }
}

/// Binding key → combination, `""` meaning inactive.
pub type BindingSet = BTreeMap<BindingKey, String>;

/// Configured shortcuts, global and local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub global_shortcut_show_panel_tabs: String,
    pub global_shortcut_show_panel_bookmarks: String,
    pub global_shortcut_show_panel_recently_closed: String,
    pub global_shortcut_show_panel_history: String,
    pub shortcut_copy_selected_item_url: String,
    pub shortcut_close_panel: String,
    pub shortcut_close_item: String,
    pub shortcut_list_down: String,
    pub shortcut_list_up: String,
    pub shortcut_edit_bookmark: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            global_shortcut_show_panel_tabs: "Control+;".to_string(),
            global_shortcut_show_panel_bookmarks: "Control+'".to_string(),
            global_shortcut_show_panel_recently_closed: INACTIVE.to_string(),
            global_shortcut_show_panel_history: INACTIVE.to_string(),
            shortcut_copy_selected_item_url: INACTIVE.to_string(),
            shortcut_close_panel: "Control+x".to_string(),
            shortcut_close_item: "Control+l".to_string(),
            shortcut_list_down: "ArrowDown".to_string(),
            shortcut_list_up: "ArrowUp".to_string(),
            shortcut_edit_bookmark: "Control+m".to_string(),
        }
    }
}

impl Shortcuts {
    /// Combination bound to `key`.
    #[must_use]
    pub fn get(&self, key: BindingKey) -> &str {
        match key {
            BindingKey::ShowPanelTabs => &self.global_shortcut_show_panel_tabs,
            BindingKey::ShowPanelBookmarks => &self.global_shortcut_show_panel_bookmarks,
            BindingKey::ShowPanelRecentlyClosed => &self.global_shortcut_show_panel_recently_closed,
            BindingKey::ShowPanelHistory => &self.global_shortcut_show_panel_history,
            BindingKey::CopySelectedItemUrl => &self.shortcut_copy_selected_item_url,
            BindingKey::ClosePanel => &self.shortcut_close_panel,
            BindingKey::CloseItem => &self.shortcut_close_item,
            BindingKey::ListDown => &self.shortcut_list_down,
            BindingKey::ListUp => &self.shortcut_list_up,
            BindingKey::EditBookmark => &self.shortcut_edit_bookmark,
        }
    }

    /// Every binding, global and local.
    #[must_use]
    pub fn bindings(&self) -> BindingSet {
        BindingKey::ALL
            .iter()
            .map(|&key| (key, self.get(key).to_string()))
            .collect()
    }

    /// Bindings that are registered with the OS hotkey service.
    #[must_use]
    pub fn global_bindings(&self) -> BindingSet {
        BindingKey::ALL
            .iter()
            .filter(|key| key.is_global())
            .map(|&key| (key, self.get(key).to_string()))
            .collect()
    }
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Application name passed to the action service when opening urls.
    pub web_browser: String,
    /// Search engine urls, each ending with `?q=`; the query is appended.
    pub web_search_engine_urls: Vec<String>,
    /// BCP 47 locale for dates, `""` for the system locale.
    pub date_locale: String,
    pub show_favicons: bool,
    pub row_display: RowDisplay,
    pub shortcuts: Shortcuts,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            web_browser: "firefox".to_string(),
            web_search_engine_urls: vec![
                "https://www.google.com?q=".to_string(),
                "https://www.duckduckgo.com?q=".to_string(),
                "https://www.qwant.com?q=".to_string(),
            ],
            date_locale: "en-EN".to_string(),
            show_favicons: true,
            row_display: RowDisplay::Compact,
            shortcuts: Shortcuts::default(),
        }
    }
}
