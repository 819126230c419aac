use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The injectable clock collaborator (§6 `setClock`).
///
/// Abstracting `now()` behind a trait is what lets `testsuite`'s randomized
/// TTL scenarios (§8 S4, S5) advance time deterministically instead of
/// sleeping in real time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// The production clock, backed directly by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A test clock whose reading is set explicitly rather than advancing on
/// its own, so a test can position "now" anywhere relative to a fixed
/// origin without racing the wall clock.
pub struct ManualClock {
    origin: Instant,
    offset_millis: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading `Instant::now()` at construction time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_millis: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "offsets used in tests never approach u64::MAX milliseconds"
        )]
        let delta = duration.as_millis() as u64;
        self.offset_millis.fetch_add(delta, Ordering::SeqCst);
    }

    /// Sets the clock to read exactly `secs` seconds past its origin.
    pub fn set_secs(&self, secs: u64) {
        self.offset_millis.store(secs * 1000, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_advances_when_told() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), t0 + Duration::from_secs(5));
    }

    #[test]
    fn set_secs_is_absolute_not_relative() {
        let clock = ManualClock::new();
        clock.set_secs(10);
        clock.set_secs(3);
        assert_eq!(clock.now(), clock.origin + Duration::from_secs(3));
    }
}
