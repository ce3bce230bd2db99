//! Item domain model and the contexts items are shown in.
//!
//! An [`Item`] is one row of the palette: an open tab, a bookmark or a history
//! entry. Which variant is live at any moment is decided by the active
//! [`Context`], which also fixes the fields the search engine looks at and the
//! actions a row supports.
//!
//! Items come from the browser bridge as JSON. Tab and window ids arrive as
//! numbers, bookmark and history ids as strings; both are normalized to
//! `String` on the way in. Any missing text field deserializes as `""`.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of milliseconds in one minute.
const MILLIS_PER_MINUTE: u64 = 60_000;

/// Number of milliseconds in one hour.
const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Number of milliseconds in one day.
const MILLIS_PER_DAY: u64 = 86_400_000;

/// Active item-collection mode of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Context {
    /// Nothing shown yet.
    #[default]
    None,
    /// Settings editor is open instead of a list.
    Settings,
    /// Open browser tabs.
    Tabs,
    /// Bookmarks.
    Bookmarks,
    /// Browsing history.
    History,
    /// Recently closed tabs.
    RecentlyClosed,
}

impl Context {
    /// Returns `true` for contexts that display an item list.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::Tabs | Self::Bookmarks | Self::History | Self::RecentlyClosed
        )
    }

    /// Fields the search engine matches against in this context.
    ///
    /// Contexts without a list fall back to the tab field set.
    #[must_use]
    pub const fn search_fields(self) -> &'static [Field] {
        match self {
            Self::Bookmarks => &[Field::Url, Field::Title, Field::Parent],
            Self::History => &[Field::Url, Field::Title],
            Self::Tabs | Self::RecentlyClosed | Self::None | Self::Settings => {
                &[Field::Url, Field::Title, Field::Domain]
            }
        }
    }

    /// Whether rows in this context can be copied to the clipboard by URL.
    #[must_use]
    pub const fn supports_copy(self) -> bool {
        matches!(self, Self::Tabs | Self::Bookmarks | Self::RecentlyClosed)
    }

    /// Whether rows in this context can be closed (tabs) or deleted (bookmarks).
    #[must_use]
    pub const fn supports_close(self) -> bool {
        matches!(self, Self::Tabs | Self::Bookmarks)
    }

    /// Header title for the panel.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::None => "tabsift",
            Self::Settings => "Settings",
            Self::Tabs => "Tabs",
            Self::Bookmarks => "Bookmarks",
            Self::History => "History",
            Self::RecentlyClosed => "Recently Closed",
        }
    }
}

/// A searchable text field of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Title,
    Domain,
    Parent,
}

/// An open (or recently closed) browser tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    #[serde(rename = "windowId", deserialize_with = "id_from_number_or_string")]
    pub window_id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub pinned: bool,
    pub active: bool,
}

/// A bookmark inside a folder path such as `/Bookmarks Toolbar/rust/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub parent: String,
}

/// A history entry.
///
/// `t` is the last visit time in milliseconds since the Unix epoch, `vc` the
/// visit count and `tc` the typed count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub t: u64,
    pub vc: u64,
    pub tc: u64,
}

impl HistoryItem {
    /// Returns a short description of how long ago the entry was last visited.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - Otherwise: "Xd ago"
    ///
    /// # Examples
    ///
    /// ```
    /// use tabsift::domain::HistoryItem;
    ///
    /// let entry = HistoryItem { t: 1_000, ..HistoryItem::default() };
    /// assert_eq!(entry.visited_ago(1_000 + 5 * 60_000), "5m ago");
    /// assert_eq!(entry.visited_ago(500), "just now");
    /// ```
    #[must_use]
    pub fn visited_ago(&self, now_ms: u64) -> String {
        let diff = now_ms.saturating_sub(self.t);

        if diff < MILLIS_PER_MINUTE {
            "just now".to_string()
        } else if diff < MILLIS_PER_HOUR {
            format!("{}m ago", diff / MILLIS_PER_MINUTE)
        } else if diff < MILLIS_PER_DAY {
            format!("{}h ago", diff / MILLIS_PER_HOUR)
        } else {
            format!("{}d ago", diff / MILLIS_PER_DAY)
        }
    }
}

/// One row of the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Tab(TabItem),
    Bookmark(BookmarkItem),
    History(HistoryItem),
}

impl Item {
    /// Raw id, unique within the variant.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Tab(tab) => &tab.id,
            Self::Bookmark(bookmark) => &bookmark.id,
            Self::History(entry) => &entry.id,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Tab(tab) => &tab.url,
            Self::Bookmark(bookmark) => &bookmark.url,
            Self::History(entry) => &entry.url,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Tab(tab) => &tab.title,
            Self::Bookmark(bookmark) => &bookmark.title,
            Self::History(entry) => &entry.title,
        }
    }

    /// Reads a searchable field, `""` when the variant has no such field.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match (self, field) {
            (_, Field::Url) => self.url(),
            (_, Field::Title) => self.title(),
            (Self::Tab(tab), Field::Domain) => &tab.domain,
            (Self::Bookmark(bookmark), Field::Parent) => &bookmark.parent,
            _ => "",
        }
    }

    /// Key identifying the item to the action service.
    ///
    /// Tabs are addressed by the composite `windowId:id`; other items by their id.
    #[must_use]
    pub fn action_id(&self) -> String {
        match self {
            Self::Tab(tab) => format!("{}:{}", tab.window_id, tab.id),
            Self::Bookmark(_) | Self::History(_) => self.id().to_string(),
        }
    }

    /// Key used by the closed/removed set.
    ///
    /// Tab ids are only unique per window, so tabs use the composite key here too.
    #[must_use]
    pub fn closed_key(&self) -> String {
        self.action_id()
    }
}

/// Accepts ids sent either as JSON numbers or strings.
fn id_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_ids_accept_numbers() {
        let tab: TabItem = serde_json::from_str(
            r#"{"id": 42, "windowId": 7, "title": "Docs", "url": "https://docs.rs", "domain": "docs.rs"}"#,
        )
        .unwrap();

        assert_eq!(tab.id, "42");
        assert_eq!(tab.window_id, "7");
        assert_eq!(Item::Tab(tab).action_id(), "7:42");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let bookmark: BookmarkItem = serde_json::from_str(r#"{"id": "b1"}"#).unwrap();
        assert_eq!(bookmark.url, "");
        assert_eq!(bookmark.parent, "");

        let item = Item::Bookmark(bookmark);
        assert_eq!(item.field(Field::Domain), "");
        assert_eq!(item.action_id(), "b1");
    }

    #[test]
    fn history_reads_short_field_names() {
        let entry: HistoryItem = serde_json::from_str(
            r#"{"id": "h1", "url": "https://a.b", "title": "A", "t": 1700000000000, "vc": 3, "tc": 1}"#,
        )
        .unwrap();

        assert_eq!(entry.vc, 3);
        assert_eq!(entry.visited_ago(1_700_000_000_000 + 2 * MILLIS_PER_DAY), "2d ago");
    }

    #[test]
    fn field_sets_follow_context() {
        assert_eq!(
            Context::Bookmarks.search_fields(),
            &[Field::Url, Field::Title, Field::Parent]
        );
        assert_eq!(Context::History.search_fields(), &[Field::Url, Field::Title]);
        assert_eq!(
            Context::RecentlyClosed.search_fields(),
            Context::Tabs.search_fields()
        );
    }
}
