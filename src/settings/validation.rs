//! Settings and bookmark-form validation.
//!
//! Validation never stops at the first problem: every violation becomes a
//! [`ValidationError`] so the panel can show an itemized list. Committed
//! settings are never touched here; callers only swap in a new [`Settings`]
//! after [`validate_settings`] returns an empty list.
//!
//! # Rules
//!
//! | Setting | Rule |
//! |---|---|
//! | local shortcuts | `""`, or 1–2 modifiers + key, or bare F1–F20 / PageUp / PageDown / Arrow keys |
//! | global shortcuts | `""`, or 1–2 modifiers + key, or bare F1–F20 / PageUp / PageDown / Delete / Insert / Home / End / CapsLock / NumLock |
//! | all shortcuts | no two active bindings share a combination (case-insensitive) |
//! | `web_search_engine_urls` | non-empty, absolute url, ends with `?q=` |
//! | `web_browser` | non-empty |
//! | `date_locale` | `""` or a BCP 47 style tag |
//! | bookmark `url` | non-empty absolute url |
//! | bookmark `folder_path` | `""` or starts and ends with `/` |

use super::keys::INACTIVE;
use super::models::{BindingKey, Settings};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const MODIFIED_KEY: &str = r##"(?:Command|Control|Alt|Option|Shift|Super|Meta)(?:\+(?:Command|Control|Alt|Option|Shift|Super|Meta))?\+(?:[A-Za-z0-9]|[.,;:'"\[\]{}<>?|_=`~!@#$%&*()\-^]|F[1-9]|F1[0-9]|F20|Enter|Escape|Backspace|Tab|Delete|Insert|Home|End|CapsLock|NumLock|Space)"##;

const LOCAL_BARE_KEYS: &str = "F[1-9]|F1[0-9]|F20|PageUp|PageDown|ArrowUp|ArrowDown|ArrowLeft|ArrowRight";

const GLOBAL_BARE_KEYS: &str = "F[1-9]|F1[0-9]|F20|PageUp|PageDown|Delete|Insert|Home|End|CapsLock|NumLock";

/// One validation failure, addressed to a single setting or form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub setting_name: String,
    pub details: String,
    pub received: String,
}

impl ValidationError {
    fn new(setting_name: impl Into<String>, details: impl Into<String>, received: impl Into<String>) -> Self {
        Self {
            setting_name: setting_name.into(),
            details: details.into(),
            received: received.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (received {:?})", self.setting_name, self.details, self.received)
    }
}

/// Bookmark edit form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookmarkForm {
    pub title: String,
    pub url: String,
    pub folder_path: String,
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, bare_keys: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(&format!("^(?:{MODIFIED_KEY})$|^(?:{bare_keys})$")).ok())
        .as_ref()
}

fn local_shortcut_regex() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, LOCAL_BARE_KEYS)
}

fn global_shortcut_regex() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, GLOBAL_BARE_KEYS)
}

fn locale_regex() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}(?:-[A-Za-z0-9]{2,8})*$").ok())
        .as_ref()
}

/// Checks a single shortcut value against the format rules for its key.
#[must_use]
pub fn is_valid_shortcut(key: BindingKey, combination: &str) -> bool {
    if combination == INACTIVE {
        return true;
    }
    let regex = if key.is_global() {
        global_shortcut_regex()
    } else {
        local_shortcut_regex()
    };
    regex.is_some_and(|re| re.is_match(combination))
}

fn check_url(setting_name: &str, value: &str, errors: &mut Vec<ValidationError>) -> bool {
    if value.is_empty() {
        errors.push(ValidationError::new(setting_name, "Please enter your url.", value));
        return false;
    }
    if url::Url::parse(value).is_err() {
        errors.push(ValidationError::new(setting_name, "The url is badly formatted.", value));
        return false;
    }
    true
}

/// Validates a complete settings value.
///
/// # Returns
///
/// Every violation found; an empty vector means the settings can be committed.
///
/// # Example
///
/// ```rust
/// use tabsift::settings::{validate_settings, Settings};
///
/// let mut settings = Settings::default();
/// assert!(validate_settings(&settings).is_empty());
///
/// settings.shortcuts.shortcut_list_up = "ArrowDown".to_string();
/// let errors = validate_settings(&settings);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].setting_name, "shortcut_list_up");
/// ```
#[must_use]
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let _span = tracing::debug_span!("validate_settings").entered();
    let mut errors = Vec::new();

    if settings.web_browser.trim().is_empty() {
        errors.push(ValidationError::new(
            "web_browser",
            "Please enter a browser name.",
            &settings.web_browser,
        ));
    }

    for (i, url) in settings.web_search_engine_urls.iter().enumerate() {
        let name = format!("web_search_engine_urls.{i}");
        if check_url(&name, url, &mut errors) && !url.ends_with("?q=") {
            errors.push(ValidationError::new(
                name,
                "Only urls ending with `?q=` are allowed",
                url,
            ));
        }
    }

    if !settings.date_locale.is_empty()
        && !locale_regex().is_some_and(|re| re.is_match(&settings.date_locale))
    {
        errors.push(ValidationError::new(
            "date_locale",
            "Invalid locale string",
            &settings.date_locale,
        ));
    }

    for key in BindingKey::ALL {
        let combination = settings.shortcuts.get(key);
        if !is_valid_shortcut(key, combination) {
            let details = if key.is_global() {
                "The global shortcut is badly formatted."
            } else {
                "The shortcut is badly formatted."
            };
            errors.push(ValidationError::new(key.setting_name(), details, combination));
        }
    }

    let mut seen: Vec<(BindingKey, &str)> = Vec::new();
    for key in BindingKey::ALL {
        let combination = settings.shortcuts.get(key);
        if combination == INACTIVE {
            continue;
        }
        if let Some((first, _)) = seen
            .iter()
            .find(|(_, other)| other.eq_ignore_ascii_case(combination))
        {
            errors.push(ValidationError::new(
                key.setting_name(),
                format!("Duplicate shortcut, already used by {first}"),
                combination,
            ));
        } else {
            seen.push((key, combination));
        }
    }

    tracing::debug!(error_count = errors.len(), "settings validated");
    errors
}

/// Validates the bookmark edit form.
#[must_use]
pub fn validate_bookmark(form: &BookmarkForm) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_url("url", &form.url, &mut errors);

    let path = &form.folder_path;
    if !path.is_empty() {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "folderPath",
                "A folder-path not starting with `/` is not allowed",
                path,
            ));
        }
        if !path.ends_with('/') {
            errors.push(ValidationError::new(
                "folderPath",
                "A folder-path not ending with `/` is not allowed",
                path,
            ));
        }
    }

    errors
}
