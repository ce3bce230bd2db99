//! Transient user notifications.
//!
//! One message slot with two deadlines: the message is hidden after
//! [`HIDE_AFTER`] and its text cleared after [`CLEAR_AFTER`] (the gap lets
//! the presentation layer fade it out). A newer notification replaces both
//! deadlines. Time only advances through [`Notifier::tick`].

use serde::Serialize;
use std::time::{Duration, Instant};

pub const HIDE_AFTER: Duration = Duration::from_millis(2000);
pub const CLEAR_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
struct Deadlines {
    hide_at: Instant,
    clear_at: Instant,
}

/// Notification visible to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<Notification>,
    deadlines: Option<Deadlines>,
}

impl Notifier {
    /// Shows `message`, superseding any notification still on screen.
    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(message = %message, "notification shown");
        self.current = Some(Notification {
            message,
            visible: true,
        });
        self.deadlines = Some(Deadlines {
            hide_at: now + HIDE_AFTER,
            clear_at: now + CLEAR_AFTER,
        });
    }

    /// Applies due deadlines. Returns `true` if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(deadlines) = &self.deadlines else {
            return false;
        };

        if now >= deadlines.clear_at {
            self.current = None;
            self.deadlines = None;
            return true;
        }

        if now >= deadlines.hide_at {
            if let Some(notification) = self.current.as_mut() {
                if notification.visible {
                    notification.visible = false;
                    return true;
                }
            }
        }

        false
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drops the notification and its deadlines.
    pub fn clear(&mut self) {
        self.current = None;
        self.deadlines = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_then_clears() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.notify("Tab closed !", start);

        assert!(!notifier.tick(start + Duration::from_millis(1999)));
        assert!(notifier.tick(start + Duration::from_millis(2000)));
        assert_eq!(notifier.current().map(|n| n.visible), Some(false));
        assert!(!notifier.tick(start + Duration::from_millis(2500)));
        assert!(notifier.tick(start + Duration::from_millis(3000)));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn newer_message_restarts_timers() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.notify("first", start);
        notifier.notify("second", start + Duration::from_millis(1500));

        assert!(!notifier.tick(start + Duration::from_millis(2500)));
        assert_eq!(notifier.current().map(|n| n.message.as_str()), Some("second"));
    }
}
