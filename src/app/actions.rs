//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O. It mutates the
//! panel state and returns a list of [`Action`]s that the driver executes in
//! order: window visibility, scroll instructions for the virtualized list,
//! requests for the background worker and hotkey reconciliation.
//!
//! # Example
//!
//! ```rust
//! use tabsift::app::Action;
//! use tabsift::domain::Context;
//! use tabsift::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::ShowWindow,
//!     Action::PostToWorker(WorkerMessage::fetch_items(Context::Tabs)),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use super::window::ScrollTo;
use crate::settings::BindingSet;
use crate::worker::WorkerMessage;

/// Commands for the driver, executed in the order they were emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Makes the panel window visible and focused.
    ShowWindow,

    /// Hides the panel window.
    HideWindow,

    /// Hands a request to the background worker.
    ///
    /// The completion comes back later as an
    /// [`Event::WorkerResponse`](super::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Scrolls the list so the viewport window starts at `offset`.
    ScrollTo(ScrollTo),

    /// Reconciles the OS hotkey registrations against a new global binding set.
    ApplyShortcuts(BindingSet),
}
