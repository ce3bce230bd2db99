//! Tabsift: a keyboard-driven command palette over browser tabs, bookmarks
//! and history.
//!
//! Tabsift is the navigation core of a launcher panel:
//! - Exact and fuzzy search over the items of the active context, debounced
//! - A wrap-around selection with a per-session set of closed rows
//! - A virtualized list window that keeps the selection visible and keeps a
//!   clicked row under the pointer
//! - Context-aware key routing (switch, open, close, delete, copy, edit)
//! - Minimal re-registration of global hotkeys when bindings change

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Headless driver (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling / key routing                     │
//! │  - Selection and viewport window                    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Shortcuts     │   │ Worker        │
//! │ (search/)     │   │ (shortcuts/)  │   │ (worker/)     │
//! │ - Exact/fuzzy │   │ - Reconcile   │   │ - Fetch items │
//! │ - Debounce    │   │ - Hotkey API  │   │ - Run actions │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Settings, Services, Infrastructure & Domain        │
//! │  - Settings model and validation (settings/)        │
//! │  - Item source and action bridge (services/)        │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Item model and errors (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Panel state machine with event/action model
//! - [`domain`]: Core domain types (items, contexts, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`search`]: Search engine and query debouncing
//! - [`services`]: Item source and item action collaborators
//! - [`settings`]: Settings model, key bindings and validation
//! - [`shortcuts`]: Global hotkey reconciliation
//! - [`worker`]: Background executor for fetches and item actions
//! - [`ui`]: View model handed to the presentation layer
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! Process configuration is a flat `key=value` map (see [`Config::from_map`]);
//! user preferences live in a TOML settings file (see [`settings`]).
//!
//! ```text
//! tabsift context=bookmarks settings=~/.config/tabsift/settings.toml trace_level=debug
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use tabsift::{handle_event, Action, AppState, Event};
//! use tabsift::domain::Context;
//! use tabsift::settings::{Platform, Settings};
//!
//! let mut state = AppState::new(Settings::default(), Platform::Other);
//! let (_, actions) = handle_event(&mut state, &Event::ShowPanel(Context::Tabs), Instant::now())?;
//!
//! assert_eq!(actions[0], Action::ShowWindow);
//! # Ok::<(), tabsift::TabsiftError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod search;
pub mod services;
pub mod settings;
pub mod shortcuts;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, RowDisplay};
pub use domain::{Context, Item, Result, TabsiftError};
pub use settings::Settings;

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. `RUST_LOG` wins
    /// when set. Default: `"info"`
    pub trace_level: Option<String>,

    /// Settings TOML file. Default: `<config dir>/tabsift/settings.toml`
    pub settings_path: PathBuf,

    /// Program run by the command item source.
    pub item_command: String,

    /// Context the panel opens on at startup.
    pub startup_context: Context,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: None,
            settings_path: infrastructure::default_settings_path(),
            item_command: services::command::DEFAULT_PROGRAM.to_string(),
            startup_context: Context::Tabs,
        }
    }
}

impl Config {
    /// Builds configuration from `key=value` pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `trace_level`: String → `Option<String>`
    /// - `settings`: path, `~` expanded
    /// - `item_command`: program name or path
    /// - `context`: `tabs`, `bookmarks`, `history` or `recently-closed`
    ///   (falls back to `tabs` on anything else)
    ///
    /// Unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tabsift::{Config, Context};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("context".to_string(), "history".to_string());
    /// map.insert("item_command".to_string(), "/opt/bridge".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.startup_context, Context::History);
    /// assert_eq!(config.item_command, "/opt/bridge");
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let settings_path = config
            .get("settings")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.settings_path, |s| PathBuf::from(infrastructure::expand_tilde(s)));

        let item_command = config
            .get("item_command")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.item_command, String::from);

        let startup_context = config
            .get("context")
            .and_then(|s| parse_list_context(s))
            .unwrap_or(defaults.startup_context);

        Self {
            trace_level: config.get("trace_level").cloned(),
            settings_path,
            item_command,
            startup_context,
        }
    }
}

fn parse_list_context(value: &str) -> Option<Context> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tabs" => Some(Context::Tabs),
        "bookmarks" => Some(Context::Bookmarks),
        "history" => Some(Context::History),
        "recently-closed" | "recently_closed" => Some(Context::RecentlyClosed),
        _ => None,
    }
}

/// Creates the panel state from configuration.
///
/// Settings are loaded from `config.settings_path`. A file that parses but
/// breaks validation is not fatal: the state starts on default settings with
/// the itemized errors on screen.
///
/// # Errors
///
/// Returns [`TabsiftError::Io`] or [`TabsiftError::SettingsParse`] when the
/// settings file exists but cannot be read or is not valid TOML.
///
/// # Example
///
/// ```rust
/// use tabsift::{initialize, Config};
///
/// let config = Config {
///     settings_path: "/nonexistent/settings.toml".into(),
///     ..Config::default()
/// };
///
/// let state = initialize(&config)?;
/// assert_eq!(state.settings.web_browser, "firefox");
/// # Ok::<(), tabsift::TabsiftError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(settings_path = %config.settings_path.display(), "initializing tabsift");

    let platform = settings::Platform::current();

    match settings::load_settings(&config.settings_path) {
        Ok(settings) => Ok(AppState::new(settings, platform)),
        Err(TabsiftError::Validation(errors)) => {
            tracing::warn!(error_count = errors.len(), "invalid settings file, starting with defaults");
            let mut state = AppState::new(Settings::default(), platform);
            state.validation_errors = errors;
            state.input_mode = InputMode::ShowingErrors;
            Ok(state)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_context_falls_back_to_tabs() {
        let mut map = BTreeMap::new();
        map.insert("context".to_string(), "settings".to_string());
        map.insert("item_command".to_string(), "   ".to_string());

        let config = Config::from_map(&map);
        assert_eq!(config.startup_context, Context::Tabs);
        assert_eq!(config.item_command, services::command::DEFAULT_PROGRAM);
    }

    #[test]
    fn invalid_settings_start_on_defaults_with_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "web_browser = \"\"").unwrap();

        let config = Config {
            settings_path: path,
            ..Config::default()
        };
        let state = initialize(&config).unwrap();

        assert_eq!(state.input_mode, InputMode::ShowingErrors);
        assert_eq!(state.validation_errors.len(), 1);
        assert_eq!(state.settings, Settings::default());
    }

    #[test]
    fn malformed_settings_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "row_display = 3").unwrap();

        let config = Config {
            settings_path: path,
            ..Config::default()
        };
        assert!(matches!(initialize(&config), Err(TabsiftError::SettingsParse(_))));
    }
}
