//! Application layer: the panel session and its navigation core.
//!
//! This layer sits between the driver (main.rs) and the worker, settings and
//! shortcut layers. It owns everything the user sees change while the panel
//! is open and decides what happens on every input.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow:
//!
//! ```text
//! Driver Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                              ↑                                  ↓
//!                              └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: The navigation dispatcher, [`handle_event`]
//! - [`modes`]: Row-height class and input routing mode
//! - [`notify`]: Auto-dismissing notification slot
//! - [`selection`]: Selected index and closed-row set
//! - [`state`]: Central panel state container
//! - [`store`]: Fetched items and their filtered view
//! - [`window`]: Viewport window placement for the virtualized list
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use tabsift::app::{handle_event, AppState, Event};
//! use tabsift::domain::Context;
//! use tabsift::settings::{Platform, Settings};
//!
//! let mut state = AppState::new(Settings::default(), Platform::current());
//! let (render, _actions) = handle_event(&mut state, &Event::ShowPanel(Context::History), Instant::now())?;
//! assert!(render && state.loading);
//! # Ok::<(), tabsift::TabsiftError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod notify;
pub mod selection;
pub mod state;
pub mod store;
pub mod window;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, RowDisplay};
pub use notify::{Notification, Notifier};
pub use selection::SelectionState;
pub use state::AppState;
pub use store::ItemStore;
pub use window::{NavigationSession, ScrollTo, ViewportWindow};
