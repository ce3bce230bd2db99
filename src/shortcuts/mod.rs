//! Global shortcut registration.
//!
//! The global bindings (show-panel shortcuts) live in the OS hotkey service,
//! which outlives any one settings value. When the bindings change, the
//! [`reconcile`] pass computes the minimal register/unregister calls that
//! bring the service from the previous binding set to the next one.
//!
//! # Architecture
//!
//! ```text
//!  SettingsChanged ──► Action::ApplyShortcuts(set)
//!                            │
//!                            ▼
//!               ShortcutManager::apply(&mut self, set)     one pass at a time
//!                            │ previous = active.replace(set)
//!                            ▼
//!               reconcile(previous, next, &hotkeys)
//!                 ├─ key A: register new ─► unregister old
//!                 ├─ key B: register new ─► unregister old     join_all
//!                 └─ ...
//! ```
//!
//! Each key runs as its own future and failures stay with their key. The
//! manager takes `&mut self`, so successive passes can never overlap.

pub mod memory;
pub mod reconciler;

pub use memory::MemoryHotkeys;
pub use reconciler::{reconcile, ReconcileReport, ShortcutManager};

use crate::domain::Result;
use crate::settings::BindingKey;
use futures_util::future::BoxFuture;

/// OS-level hotkey registration.
///
/// Combinations compare case-insensitively. When a registered combination is
/// pressed the service reports the [`BindingKey`] it was registered for.
pub trait HotkeyService: Send + Sync {
    /// Registers `combination` to trigger `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TabsiftError::Hotkey`] if the OS refuses the combination.
    fn register<'a>(&'a self, combination: &'a str, key: BindingKey) -> BoxFuture<'a, Result<()>>;

    /// Releases `combination`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TabsiftError::Hotkey`] if the OS call fails.
    fn unregister<'a>(&'a self, combination: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Whether `combination` is currently registered.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TabsiftError::Hotkey`] if the state cannot be queried.
    fn is_registered<'a>(&'a self, combination: &'a str) -> BoxFuture<'a, Result<bool>>;
}
