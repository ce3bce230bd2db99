//! Collaborators the navigation core talks to.
//!
//! The core never enumerates tabs or touches the browser itself. It goes
//! through two object-safe async traits:
//!
//! - [`ItemSource`]: fetches the items of one context
//! - [`ActionService`]: performs an action on an item or URL
//!
//! [`command::CommandBridge`] implements both on top of an external command
//! that prints JSON chunks; [`memory`] holds in-process implementations that
//! serve fixed data and record calls.

pub mod command;
pub mod memory;

pub use command::{parse_chunks, CommandBridge};
pub use memory::{RecordedAction, RecordingActions, StaticItems};

use crate::domain::{Context, Item, Result};
use crate::settings::BookmarkForm;
use futures_util::future::BoxFuture;

/// Fetches the items of a context.
pub trait ItemSource: Send + Sync {
    /// Returns every item of `context`, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TabsiftError::ItemSource`] when the backend fails or
    /// its output cannot be parsed.
    fn fetch(&self, context: Context) -> BoxFuture<'_, Result<Vec<Item>>>;
}

/// Item and URL actions.
///
/// Every method resolves once the backend finished; failures surface as
/// [`crate::TabsiftError::Action`].
pub trait ActionService: Send + Sync {
    fn open_url<'a>(&'a self, url: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Focuses the tab `composite_id` (`windowId:id`) and raises the browser.
    fn switch_to_item<'a>(&'a self, composite_id: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>>;

    fn close_item<'a>(&'a self, composite_id: &'a str) -> BoxFuture<'a, Result<()>>;

    fn delete_bookmark<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>>;

    fn copy_to_clipboard<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>>;

    fn create_bookmark<'a>(&'a self, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>>;

    fn update_bookmark<'a>(&'a self, id: &'a str, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>>;
}
