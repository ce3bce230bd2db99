//! Single-slot debouncer driven by explicit timestamps.
//!
//! Each call to [`Debouncer::schedule`] supersedes whatever was pending: only
//! the most recent value is ever released, and only once its deadline has
//! passed. There is one outstanding deadline at a time, so callers poll it
//! from their timer tick instead of juggling runtime timer handles.

use std::time::{Duration, Instant};

/// Quiet period a query must hold before it is evaluated.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due: Instant,
}

/// Holds at most one pending value and releases it after `delay`.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use tabsift::search::Debouncer;
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(200));
///
/// debouncer.schedule("g", start);
/// debouncer.schedule("gi", start + Duration::from_millis(50));
///
/// assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(250)), Some("gi"));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value with `value`, due `delay` after `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        let due = now + self.delay;
        self.pending = Some(Pending { value, due });
        tracing::trace!(delay_ms = self.delay.as_millis(), "debounce rescheduled");
    }

    /// Releases the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|p| now >= p.due);

        if ready {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Deadline of the pending value, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.schedule("g".to_string(), start);
        debouncer.schedule("gi".to_string(), start + Duration::from_millis(75));
        debouncer.schedule("git".to_string(), start + Duration::from_millis(150));

        assert_eq!(debouncer.poll(start + Duration::from_millis(349)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(350)),
            Some("git".to_string())
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn reschedule_moves_the_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        debouncer.schedule("a", start);
        debouncer.schedule("b", start + Duration::from_millis(150));

        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(350)));
        assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), Some("b"));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(1, start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
