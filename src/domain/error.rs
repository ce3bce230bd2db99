//! Error types for tabsift.
//!
//! This module defines the centralized error type [`TabsiftError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! The navigation core itself (search, selection, windowing) never fails; these
//! errors come from the edges: loading settings, talking to the item source,
//! running item actions and registering hotkeys.

use crate::settings::ValidationError;
use thiserror::Error;

/// The main error type for tabsift operations.
///
/// # Examples
///
/// ```
/// use tabsift::TabsiftError;
///
/// fn fetch() -> Result<(), TabsiftError> {
///     Err(TabsiftError::ItemSource("command exited with status 1".to_string()))
/// }
///
/// assert!(fetch().unwrap_err().to_string().contains("status 1"));
/// ```
#[derive(Debug, Error)]
pub enum TabsiftError {
    /// Filesystem or process I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Item payload or message could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file is not valid TOML or has mistyped fields.
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings or form input failed validation.
    ///
    /// Carries every violation found, not only the first one, so the caller
    /// can present an itemized list.
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// The item source command failed or produced unusable output.
    #[error("Item source error: {0}")]
    ItemSource(String),

    /// An item action (open, switch, close, delete, copy) failed.
    #[error("Action error: {0}")]
    Action(String),

    /// The hotkey registration service rejected an operation.
    #[error("Hotkey error: {0}")]
    Hotkey(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for tabsift operations.
pub type Result<T> = std::result::Result<T, TabsiftError>;
