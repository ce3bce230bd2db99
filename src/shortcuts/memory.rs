//! In-process hotkey registry.
//!
//! Stands in for the OS hotkey service in the headless driver and in tests.
//! Counts register/unregister calls so tests can assert a pass was a no-op,
//! and can be told to reject specific combinations.

use super::HotkeyService;
use crate::domain::{Result, TabsiftError};
use crate::settings::BindingKey;
use futures_util::future::BoxFuture;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Registration {
    combination: String,
    key: BindingKey,
}

/// Hotkey registry held in memory, keyed by lowercased combination.
#[derive(Debug, Default)]
pub struct MemoryHotkeys {
    registrations: Mutex<BTreeMap<String, Registration>>,
    rejected: Mutex<HashSet<String>>,
    register_calls: AtomicUsize,
    unregister_calls: AtomicUsize,
}

impl MemoryHotkeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later registration of `combination` fail.
    pub fn fail_on(&self, combination: &str) {
        lock(&self.rejected).insert(combination.to_ascii_lowercase());
    }

    /// Binding triggered by pressing `combination`, if any.
    #[must_use]
    pub fn pressed(&self, combination: &str) -> Option<BindingKey> {
        lock(&self.registrations)
            .get(&combination.to_ascii_lowercase())
            .map(|registration| registration.key)
    }

    #[must_use]
    pub fn is_registered_now(&self, combination: &str) -> bool {
        lock(&self.registrations).contains_key(&combination.to_ascii_lowercase())
    }

    /// Registered combinations as originally spelled, sorted case-insensitively.
    #[must_use]
    pub fn registered(&self) -> Vec<String> {
        lock(&self.registrations)
            .values()
            .map(|registration| registration.combination.clone())
            .collect()
    }

    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn unregister_calls(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HotkeyService for MemoryHotkeys {
    fn register<'a>(&'a self, combination: &'a str, key: BindingKey) -> BoxFuture<'a, Result<()>> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let normalized = combination.to_ascii_lowercase();

        let result = if lock(&self.rejected).contains(&normalized) {
            Err(TabsiftError::Hotkey(format!("{combination} is reserved")))
        } else {
            let mut registrations = lock(&self.registrations);
            if registrations.contains_key(&normalized) {
                Err(TabsiftError::Hotkey(format!("{combination} is already registered")))
            } else {
                registrations.insert(
                    normalized,
                    Registration {
                        combination: combination.to_string(),
                        key,
                    },
                );
                Ok(())
            }
        };

        Box::pin(std::future::ready(result))
    }

    fn unregister<'a>(&'a self, combination: &'a str) -> BoxFuture<'a, Result<()>> {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        let removed = lock(&self.registrations).remove(&combination.to_ascii_lowercase());

        let result = match removed {
            Some(_) => Ok(()),
            None => Err(TabsiftError::Hotkey(format!("{combination} is not registered"))),
        };
        Box::pin(std::future::ready(result))
    }

    fn is_registered<'a>(&'a self, combination: &'a str) -> BoxFuture<'a, Result<bool>> {
        Box::pin(std::future::ready(Ok(self.is_registered_now(combination))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn double_registration_is_refused() {
        let hotkeys = MemoryHotkeys::new();
        hotkeys.register("Control+;", BindingKey::ShowPanelTabs).await.unwrap();

        let err = hotkeys
            .register("control+;", BindingKey::ShowPanelBookmarks)
            .await
            .unwrap_err();
        assert!(matches!(err, TabsiftError::Hotkey(_)));
        assert_eq!(hotkeys.pressed("CONTROL+;"), Some(BindingKey::ShowPanelTabs));
        assert_eq!(hotkeys.register_calls(), 2);
    }

    #[tokio::test]
    async fn unregister_unknown_is_an_error() {
        let hotkeys = MemoryHotkeys::new();
        assert!(hotkeys.unregister("F5").await.is_err());
        assert_eq!(hotkeys.unregister_calls(), 1);
    }
}
