//! Items of the active context and their filtered view.

use crate::domain::{Context, Item};
use crate::search::{self, SearchState};
use crate::settings::BookmarkForm;

/// Full item list last fetched for the active context, plus the subset
/// the current search lets through.
///
/// Indices used by the selection and the viewport always refer to
/// [`filtered`](Self::filtered).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<Item>,
    filtered: Vec<Item>,
}

impl ItemStore {
    /// Replaces the item list; the filtered view starts out unfiltered.
    pub fn replace(&mut self, items: Vec<Item>) {
        self.filtered.clone_from(&items);
        self.items = items;
    }

    /// Recomputes the filtered view from the full list.
    pub fn refilter(&mut self, context: Context, search: &SearchState) {
        self.filtered = search::filter(&self.items, context, &search.query, search.mode);
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn filtered(&self) -> &[Item] {
        &self.filtered
    }

    /// Number of rows in the filtered view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Row `index` of the filtered view.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.filtered.get(index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.filtered.clear();
    }

    /// Applies an edited bookmark to both lists, keeping its position.
    ///
    /// Returns `false` if no bookmark has that id.
    pub fn update_bookmark(&mut self, id: &str, form: &BookmarkForm) -> bool {
        let mut found = false;
        for item in self.items.iter_mut().chain(self.filtered.iter_mut()) {
            if let Item::Bookmark(bookmark) = item {
                if bookmark.id == id {
                    bookmark.title.clone_from(&form.title);
                    bookmark.url.clone_from(&form.url);
                    bookmark.parent.clone_from(&form.folder_path);
                    found = true;
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookmarkItem;
    use crate::search::SearchMode;

    fn bookmark(id: &str, title: &str) -> Item {
        Item::Bookmark(BookmarkItem {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://{id}.test"),
            parent: "/".to_string(),
        })
    }

    #[test]
    fn refilter_keeps_full_list() {
        let mut store = ItemStore::default();
        store.replace(vec![bookmark("a", "Rust"), bookmark("b", "Go")]);

        let search = SearchState {
            query: "rust".to_string(),
            mode: SearchMode::Exact,
        };
        store.refilter(Context::Bookmarks, &search);

        assert_eq!(store.len(), 1);
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.get(0).map(Item::id), Some("a"));
        assert_eq!(store.get(1), None);
    }

    #[test]
    fn bookmark_edit_updates_in_place() {
        let mut store = ItemStore::default();
        store.replace(vec![bookmark("a", "Rust"), bookmark("b", "Go")]);

        let form = BookmarkForm {
            title: "Golang".to_string(),
            url: "https://go.dev".to_string(),
            folder_path: "/lang/".to_string(),
        };
        assert!(store.update_bookmark("b", &form));
        assert!(!store.update_bookmark("zzz", &form));

        for list in [store.items(), store.filtered()] {
            assert_eq!(list[1].title(), "Golang");
            assert_eq!(list[1].url(), "https://go.dev");
        }
    }
}
