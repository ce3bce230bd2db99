//! Presentation-facing layer.
//!
//! The panel itself is drawn by an external presentation layer; this module
//! turns the session state into the data it renders.
//!
//! ```text
//! AppState → compute_viewmodel → PanelViewModel → presentation
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types
//! - [`helpers`]: Match highlighting and text shortening

pub mod helpers;
pub mod viewmodel;

pub use viewmodel::{
    BookmarkFormView, EmptyState, HeaderInfo, PanelViewModel, RowView, SearchBarInfo, WebSearchInfo,
};
