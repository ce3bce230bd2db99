//! Filesystem locations for settings and traces.
//!
//! Both directories come from the platform conventions exposed by `dirs`
//! (`~/.config` and `~/.local/share` on Linux, `~/Library/Application
//! Support` on macOS). When the platform reports no such directory the
//! current directory is used.

use std::path::PathBuf;

const APP_DIR: &str = "tabsift";

/// Directory holding `settings.toml`.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory holding the trace file.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default settings file location.
#[must_use]
pub fn default_settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and tildes when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use tabsift::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/~"), "relative/~");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}
