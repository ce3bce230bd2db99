//! Key-combination normalization.
//!
//! Bindings are stored as strings like `Control+Shift+k`. Incoming key presses
//! are normalized to the same shape: modifiers in a fixed order
//! (`Control`, `Alt`/`Option`, `Meta`/`Command`, `Shift`) followed by the
//! lowercased key. Comparison against a binding ignores ASCII case, so the
//! configured `ArrowDown` matches the normalized `arrowdown`.

use serde::{Deserialize, Serialize};

/// Value of a binding that is switched off.
pub const INACTIVE: &str = "";

/// Naming convention for the alt and meta modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `Option` and `Command`.
    MacOs,
    /// `Alt` and `Meta`.
    Other,
}

impl Platform {
    /// Platform the binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    const fn alt_name(self) -> &'static str {
        match self {
            Self::MacOs => "Option",
            Self::Other => "Alt",
        }
    }

    const fn meta_name(self) -> &'static str {
        match self {
            Self::MacOs => "Command",
            Self::Other => "Meta",
        }
    }
}

/// A single key press with its modifier state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key name as reported by the input layer (`"j"`, `"Enter"`, `"ArrowDown"`).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    /// Key press without modifiers.
    #[must_use]
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Normalized combination string for this press.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tabsift::settings::{KeyPress, Platform};
    ///
    /// let press = KeyPress { key: "K".into(), ctrl: true, shift: true, ..KeyPress::default() };
    /// assert_eq!(press.combination(Platform::Other), "Control+Shift+k");
    ///
    /// let press = KeyPress { key: "p".into(), meta: true, alt: true, ..KeyPress::default() };
    /// assert_eq!(press.combination(Platform::MacOs), "Option+Command+p");
    /// ```
    #[must_use]
    pub fn combination(&self, platform: Platform) -> String {
        let mut combo = String::new();
        if self.ctrl {
            combo.push_str("Control+");
        }
        if self.alt {
            combo.push_str(platform.alt_name());
            combo.push('+');
        }
        if self.meta {
            combo.push_str(platform.meta_name());
            combo.push('+');
        }
        if self.shift {
            combo.push_str("Shift+");
        }
        combo.push_str(&self.key.to_lowercase());
        combo
    }

    /// Parses a combination string such as `"Control+j"` back into a key press.
    ///
    /// Modifier names of both platforms are accepted. Returns `None` for an
    /// empty string or a string with no base key.
    ///
    /// A bare `+` is the plus key itself, and `Control++` is Control with plus.
    #[must_use]
    pub fn parse(combination: &str) -> Option<Self> {
        let combination = combination.trim();
        if combination.is_empty() {
            return None;
        }

        let mut press = Self::default();
        let mut rest = combination;

        loop {
            let Some((head, tail)) = rest.split_once('+') else {
                break;
            };
            if tail.is_empty() {
                break;
            }
            match head.to_ascii_lowercase().as_str() {
                "control" | "ctrl" => press.ctrl = true,
                "alt" | "option" => press.alt = true,
                "meta" | "command" | "super" => press.meta = true,
                "shift" => press.shift = true,
                _ => break,
            }
            rest = tail;
        }

        if rest.is_empty() {
            return None;
        }
        press.key = rest.to_string();
        Some(press)
    }

    /// Whether this press is the Enter key, regardless of modifiers.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.key.eq_ignore_ascii_case("enter")
    }

    /// Whether this press triggers `binding`. Inactive bindings never match.
    #[must_use]
    pub fn matches(&self, binding: &str, platform: Platform) -> bool {
        same_combination(&self.combination(platform), binding)
    }
}

/// Case-insensitive combination equality, with the inactive value never equal to anything.
#[must_use]
pub fn same_combination(a: &str, b: &str) -> bool {
    a != INACTIVE && b != INACTIVE && a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_come_in_fixed_order() {
        let press = KeyPress {
            key: "x".into(),
            ctrl: true,
            alt: true,
            meta: true,
            shift: true,
        };
        assert_eq!(press.combination(Platform::Other), "Control+Alt+Meta+Shift+x");
        assert_eq!(press.combination(Platform::MacOs), "Control+Option+Command+Shift+x");
    }

    #[test]
    fn bindings_match_ignoring_case() {
        let down = KeyPress::plain("ArrowDown");
        assert_eq!(down.combination(Platform::Other), "arrowdown");
        assert!(down.matches("ArrowDown", Platform::Other));
        assert!(!down.matches(INACTIVE, Platform::Other));
    }

    #[test]
    fn parse_round_trips_modifiers() {
        let press = KeyPress::parse("Control+Shift+j").unwrap();
        assert!(press.ctrl && press.shift && !press.alt);
        assert_eq!(press.key, "j");

        assert_eq!(KeyPress::parse("Enter").unwrap().key, "Enter");
        assert_eq!(KeyPress::parse("Control++").unwrap().key, "+");
        assert!(KeyPress::parse("").is_none());
    }

    #[test]
    fn enter_ignores_modifiers() {
        let mut press = KeyPress::plain("Enter");
        press.shift = true;
        assert!(press.is_enter());
    }
}
