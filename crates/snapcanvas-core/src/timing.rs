//! Rate limiting and cancellable deferred work.
//!
//! Time is always passed in by the caller, so hosts drive the clock and
//! tests can step it deterministically.

use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Accepts at most one event per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true and records `now` if the interval has elapsed since the
    /// last accepted event. The first event is always accepted.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }

    /// Forget the last accepted event.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// A single-slot scheduled task.
///
/// Scheduling replaces (cancels) whatever was pending, so at most one task
/// is ever outstanding.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` to become due at `due`, returning the cancelled
    /// task's value if one was pending.
    pub fn schedule(&mut self, due: Instant, value: T) -> Option<T> {
        self.pending.replace((due, value)).map(|(_, v)| v)
    }

    /// Cancel the pending task.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending task becomes due.
    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, v)| v)
    }

    /// Take the pending value if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_throttle_accepts_first_event() {
        let mut throttle = Throttle::new(ms(16));
        assert!(throttle.try_accept(Instant::now()));
    }

    #[test]
    fn test_throttle_rejects_within_interval() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(16));

        assert!(throttle.try_accept(t0));
        assert!(!throttle.try_accept(t0 + ms(5)));
        assert!(!throttle.try_accept(t0 + ms(15)));
        assert!(throttle.try_accept(t0 + ms(16)));
        // Interval counts from the last accepted event.
        assert!(!throttle.try_accept(t0 + ms(20)));
        assert!(throttle.try_accept(t0 + ms(32)));
    }

    #[test]
    fn test_throttle_reset() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(16));
        assert!(throttle.try_accept(t0));
        throttle.reset();
        assert!(throttle.try_accept(t0 + ms(1)));
    }

    #[test]
    fn test_deferred_replaces_pending() {
        let t0 = Instant::now();
        let mut task = Deferred::new();

        assert_eq!(task.schedule(t0 + ms(40), 1.5), None);
        assert_eq!(task.schedule(t0 + ms(60), 0.8), Some(1.5));
        assert!(task.is_pending());
        assert_eq!(task.peek(), Some(&0.8));
    }

    #[test]
    fn test_deferred_take_due() {
        let t0 = Instant::now();
        let mut task = Deferred::new();
        task.schedule(t0 + ms(40), "settle");

        assert_eq!(task.take_due(t0 + ms(39)), None);
        assert!(task.is_pending());
        assert_eq!(task.take_due(t0 + ms(40)), Some("settle"));
        assert!(!task.is_pending());
        assert_eq!(task.take_due(t0 + ms(100)), None);
    }

    #[test]
    fn test_deferred_cancel() {
        let t0 = Instant::now();
        let mut task = Deferred::new();
        task.schedule(t0, 3);
        assert_eq!(task.cancel(), Some(3));
        assert_eq!(task.take_due(t0 + ms(1)), None);
    }
}
