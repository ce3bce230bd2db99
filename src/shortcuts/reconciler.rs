//! Binding-set diffing against the hotkey service.

use super::HotkeyService;
use crate::settings::{same_combination, BindingKey, BindingSet, INACTIVE};
use futures_util::future::join_all;
use std::collections::BTreeSet;
use tracing::Instrument;

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub registered: Vec<(BindingKey, String)>,
    pub unregistered: Vec<(BindingKey, String)>,
    /// Per-key failures; the other keys were still reconciled.
    pub failures: Vec<(BindingKey, String)>,
}

impl ReconcileReport {
    /// `true` if the pass made no register or unregister call.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.registered.is_empty() && self.unregistered.is_empty()
    }
}

#[derive(Debug, Default)]
struct KeyOutcome {
    registered: Option<String>,
    unregistered: Option<String>,
    failures: Vec<String>,
}

fn binding(set: &BindingSet, key: BindingKey) -> &str {
    set.get(&key).map_or(INACTIVE, String::as_str)
}

/// Brings the hotkey service from `previous` to `next`.
///
/// For every key present in either set, concurrently:
///
/// 1. If the next combination is active and not yet registered, register it.
/// 2. If a previous set exists, its combination was active, differs from the
///    next one and is still registered, unregister it.
///
/// Registration precedes unregistration within a key, so a renamed binding
/// is never absent from the service. Both steps check the registration state
/// first, which makes a repeated pass with the same arguments a no-op.
///
/// # Parameters
///
/// * `previous` - Set the service was last reconciled to, `None` on the first pass
/// * `next` - Set to reconcile to
/// * `hotkeys` - Service to mutate
///
/// # Returns
///
/// A [`ReconcileReport`] listing the calls made and the per-key failures.
pub async fn reconcile<H>(previous: Option<&BindingSet>, next: &BindingSet, hotkeys: &H) -> ReconcileReport
where
    H: HotkeyService + ?Sized,
{
    let span = tracing::debug_span!(
        "reconcile_shortcuts",
        first_pass = previous.is_none(),
        binding_count = next.len()
    );

    reconcile_all(previous, next, hotkeys).instrument(span).await
}

async fn reconcile_all<H>(previous: Option<&BindingSet>, next: &BindingSet, hotkeys: &H) -> ReconcileReport
where
    H: HotkeyService + ?Sized,
{
    let keys: BTreeSet<BindingKey> = next
        .keys()
        .chain(previous.into_iter().flat_map(BindingSet::keys))
        .copied()
        .collect();

    let outcomes = join_all(keys.iter().map(|&key| {
        let old = previous.map(|set| binding(set, key));
        reconcile_key(key, old, binding(next, key), hotkeys)
    }))
    .await;

    let mut report = ReconcileReport::default();
    for (key, outcome) in keys.into_iter().zip(outcomes) {
        if let Some(combination) = outcome.registered {
            report.registered.push((key, combination));
        }
        if let Some(combination) = outcome.unregistered {
            report.unregistered.push((key, combination));
        }
        report
            .failures
            .extend(outcome.failures.into_iter().map(|message| (key, message)));
    }

    tracing::debug!(
        registered = report.registered.len(),
        unregistered = report.unregistered.len(),
        failures = report.failures.len(),
        "shortcut reconciliation finished"
    );
    report
}

async fn reconcile_key<H>(key: BindingKey, previous: Option<&str>, next: &str, hotkeys: &H) -> KeyOutcome
where
    H: HotkeyService + ?Sized,
{
    let mut outcome = KeyOutcome::default();

    if next != INACTIVE {
        match hotkeys.is_registered(next).await {
            Ok(true) => {}
            Ok(false) => match hotkeys.register(next, key).await {
                Ok(()) => {
                    tracing::debug!(key = %key, combination = %next, "shortcut registered");
                    outcome.registered = Some(next.to_string());
                }
                Err(e) => {
                    tracing::warn!(key = %key, combination = %next, error = %e, "shortcut registration failed");
                    outcome.failures.push(e.to_string());
                }
            },
            Err(e) => outcome.failures.push(e.to_string()),
        }
    }

    let Some(old) = previous else {
        return outcome;
    };
    if old == INACTIVE || same_combination(old, next) {
        return outcome;
    }

    match hotkeys.is_registered(old).await {
        Ok(true) => match hotkeys.unregister(old).await {
            Ok(()) => {
                tracing::debug!(key = %key, combination = %old, "shortcut unregistered");
                outcome.unregistered = Some(old.to_string());
            }
            Err(e) => {
                tracing::warn!(key = %key, combination = %old, error = %e, "shortcut unregistration failed");
                outcome.failures.push(e.to_string());
            }
        },
        Ok(false) => {}
        Err(e) => outcome.failures.push(e.to_string()),
    }

    outcome
}

/// Owns the hotkey service and the last applied binding set.
///
/// [`apply`](Self::apply) borrows the manager mutably for the whole pass, so
/// passes are processed one at a time in the order they are applied.
#[derive(Debug)]
pub struct ShortcutManager<H> {
    hotkeys: H,
    active: Option<BindingSet>,
}

impl<H: HotkeyService> ShortcutManager<H> {
    #[must_use]
    pub const fn new(hotkeys: H) -> Self {
        Self {
            hotkeys,
            active: None,
        }
    }

    /// Reconciles from the last applied set to `next` and remembers `next`.
    pub async fn apply(&mut self, next: BindingSet) -> ReconcileReport {
        let previous = self.active.take();
        let report = reconcile(previous.as_ref(), &next, &self.hotkeys).await;
        self.active = Some(next);
        report
    }

    /// Last applied set, `None` before the first pass.
    #[must_use]
    pub const fn active(&self) -> Option<&BindingSet> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn hotkeys(&self) -> &H {
        &self.hotkeys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::MemoryHotkeys;

    fn set(pairs: &[(BindingKey, &str)]) -> BindingSet {
        pairs
            .iter()
            .map(|(key, combination)| (*key, (*combination).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn first_pass_registers_active_bindings_only() {
        let hotkeys = MemoryHotkeys::new();
        let next = set(&[
            (BindingKey::ShowPanelTabs, "Control+;"),
            (BindingKey::ShowPanelHistory, ""),
        ]);

        let report = reconcile(None, &next, &hotkeys).await;

        assert_eq!(
            report.registered,
            vec![(BindingKey::ShowPanelTabs, "Control+;".to_string())]
        );
        assert!(report.unregistered.is_empty());
        assert_eq!(hotkeys.pressed("control+;"), Some(BindingKey::ShowPanelTabs));
        assert_eq!(hotkeys.unregister_calls(), 0);
    }

    #[tokio::test]
    async fn deactivated_binding_is_released() {
        let hotkeys = MemoryHotkeys::new();
        let previous = set(&[(BindingKey::ShowPanelBookmarks, "Control+'")]);
        reconcile(None, &previous, &hotkeys).await;

        let next = set(&[(BindingKey::ShowPanelBookmarks, "")]);
        let report = reconcile(Some(&previous), &next, &hotkeys).await;

        assert_eq!(
            report.unregistered,
            vec![(BindingKey::ShowPanelBookmarks, "Control+'".to_string())]
        );
        assert!(!hotkeys.is_registered_now("Control+'"));
    }

    #[tokio::test]
    async fn case_change_is_not_a_rebind() {
        let hotkeys = MemoryHotkeys::new();
        let previous = set(&[(BindingKey::ShowPanelTabs, "Control+K")]);
        reconcile(None, &previous, &hotkeys).await;

        let next = set(&[(BindingKey::ShowPanelTabs, "control+k")]);
        let report = reconcile(Some(&previous), &next, &hotkeys).await;

        assert!(report.is_noop());
        assert!(hotkeys.is_registered_now("Control+K"));
    }

    #[tokio::test]
    async fn one_failing_key_does_not_stop_the_others() {
        let hotkeys = MemoryHotkeys::new();
        hotkeys.fail_on("Control+;");

        let next = set(&[
            (BindingKey::ShowPanelTabs, "Control+;"),
            (BindingKey::ShowPanelBookmarks, "Control+'"),
        ]);
        let report = reconcile(None, &next, &hotkeys).await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, BindingKey::ShowPanelTabs);
        assert_eq!(
            report.registered,
            vec![(BindingKey::ShowPanelBookmarks, "Control+'".to_string())]
        );
    }

    #[tokio::test]
    async fn manager_diffs_against_last_applied_set() {
        let mut manager = ShortcutManager::new(MemoryHotkeys::new());

        manager
            .apply(set(&[(BindingKey::ShowPanelTabs, "Control+;")]))
            .await;
        let report = manager
            .apply(set(&[(BindingKey::ShowPanelTabs, "Control+t")]))
            .await;

        assert_eq!(
            report.registered,
            vec![(BindingKey::ShowPanelTabs, "Control+t".to_string())]
        );
        assert_eq!(
            report.unregistered,
            vec![(BindingKey::ShowPanelTabs, "Control+;".to_string())]
        );
        assert_eq!(manager.hotkeys().registered(), vec!["Control+t".to_string()]);
        assert_eq!(
            manager.active().map(|s| s[&BindingKey::ShowPanelTabs].as_str()),
            Some("Control+t")
        );
    }
}
