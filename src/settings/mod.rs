//! User settings: model, key bindings, validation and loading.
//!
//! # Modules
//!
//! - [`models`]: [`Settings`], [`Shortcuts`] and the [`BindingSet`] derived from them
//! - [`keys`]: key-press normalization and combination matching
//! - [`validation`]: itemized settings and bookmark-form validation
//!
//! Settings are only ever read from disk; edits arrive as complete
//! [`Settings`] values through the event handler, which validates them before
//! they replace the committed copy.

pub mod keys;
pub mod models;
pub mod validation;

pub use keys::{same_combination, KeyPress, Platform, INACTIVE};
pub use models::{BindingKey, BindingSet, Settings, Shortcuts, Theme};
pub use validation::{validate_bookmark, validate_settings, BookmarkForm, ValidationError};

use crate::domain::{Result, TabsiftError};
use std::path::Path;

/// Loads and validates settings from a TOML file.
///
/// A missing file yields the defaults. A file that parses but breaks a
/// validation rule is rejected as a whole.
///
/// # Errors
///
/// - [`TabsiftError::Io`] if the file exists but cannot be read
/// - [`TabsiftError::SettingsParse`] if the contents are not valid settings TOML
/// - [`TabsiftError::Validation`] with every rule violation found
pub fn load_settings(path: &Path) -> Result<Settings> {
    let _span = tracing::debug_span!("load_settings", path = %path.display()).entered();

    if !path.exists() {
        tracing::debug!("settings file not found, using defaults");
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;

    let errors = validate_settings(&settings);
    if !errors.is_empty() {
        tracing::warn!(error_count = errors.len(), "settings file rejected");
        return Err(TabsiftError::Validation(errors));
    }

    tracing::debug!("settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"dark\"\n[shortcuts]\nshortcut_list_down = \"Control+j\"").unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.shortcuts.shortcut_list_down, "Control+j");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "web_search_engine_urls = [\"https://example.com\"]").unwrap();

        match load_settings(file.path()) {
            Err(TabsiftError::Validation(errors)) => {
                assert_eq!(errors[0].setting_name, "web_search_engine_urls.0");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = [").unwrap();
        assert!(matches!(load_settings(file.path()), Err(TabsiftError::SettingsParse(_))));
    }
}
