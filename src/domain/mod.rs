//! Domain layer for tabsift.
//!
//! Core types shared by every other layer, independent of how items are
//! fetched or rendered.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: The [`Item`] sum type and the [`Context`] it is shown in
//!
//! # Examples
//!
//! ```
//! use tabsift::domain::{Context, Item, TabItem};
//!
//! let tab = Item::Tab(TabItem {
//!     id: "12".to_string(),
//!     window_id: "3".to_string(),
//!     url: "https://docs.rs".to_string(),
//!     ..TabItem::default()
//! });
//!
//! assert_eq!(tab.action_id(), "3:12");
//! assert!(Context::Tabs.is_list());
//! ```

pub mod error;
pub mod item;

pub use error::{Result, TabsiftError};
pub use item::{BookmarkItem, Context, Field, HistoryItem, Item, TabItem};
