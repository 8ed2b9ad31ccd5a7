//! # Time Sources
//!
//! Timestamps and the clocks that produce them. The detector never reads
//! wall-clock time on its own; every request carries a [`Timestamp`], and the
//! convenience path stamps requests through an injected [`Clock`].
//!
//! ## Why Offsets Instead of Wall Time
//!
//! ```text
//!     Wall clock:                    Monotonic offsets:
//!
//!     14:03:07.120  ──┐ NTP step     0.000s ──┐
//!     14:02:59.800 ◄──┘ (backwards!) 0.250s   │ always forward
//!     14:03:00.100                   0.512s ◄─┘
//! ```
//!
//! A [`Timestamp`] is the elapsed time since its clock's origin, so it is
//! immune to wall-clock adjustments. It is also trivially fabricated in
//! tests: `Duration::from_millis(100)` *is* a valid timestamp, no mocking
//! framework required.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A point in time, expressed as the offset from the owning clock's origin.
///
/// Timestamps from different clocks share no origin and must not be mixed;
/// one detector, one clock, one timeline.
pub type Timestamp = Duration;

/// Source of monotonic timestamps.
///
/// Production code uses [`MonotonicClock`]; tests and simulations use
/// [`ManualClock`] to step time by hand. Implementations should never run
/// backwards; the detector treats regressions defensively, but a
/// well-behaved clock simply does not produce them.
pub trait Clock {
    /// Returns the current offset from the clock's origin.
    fn now(&self) -> Timestamp;
}

/// Real-time clock backed by [`Instant`], anchored at construction.
///
/// # Example
///
/// ```rust
/// use sentinel::{Clock, MonotonicClock};
///
/// let clock = MonotonicClock::new();
/// let a = clock.now();
/// let b = clock.now();
/// assert!(b >= a);
/// ```
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the moment of this call.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Timestamp {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for tests and simulations.
///
/// Clones share the same underlying counter, so a driver can keep one handle
/// while the detector owns another:
///
/// ```rust
/// use sentinel::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
///
/// handle.advance(Duration::from_secs(3));
/// assert_eq!(clock.now(), Duration::from_secs(3));
/// ```
///
/// The counter has nanosecond resolution.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock already advanced to `at`.
    pub fn starting_at(at: Timestamp) -> Self {
        let clock = Self::new();
        clock.set(at);
        clock
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.nanos.fetch_add(step.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Jumps the clock to an absolute offset.
    ///
    /// Jumping backwards is allowed; tests use it to exercise the
    /// detector's clock-regression handling.
    pub fn set(&self, to: Timestamp) {
        self.nanos.store(to.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();

        for _ in 0..10 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_monotonic_clock_default() {
        let clock = MonotonicClock::default();
        assert!(clock.now() < Duration::from_secs(60));
    }

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[test]
    fn test_manual_clock_set_and_regress() {
        let clock = ManualClock::starting_at(Duration::from_secs(10));
        assert_eq!(clock.now(), Duration::from_secs(10));

        clock.set(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_manual_clock_clones_share_state() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));

        clock.advance(Duration::from_secs(1));
        assert_eq!(handle.now(), Duration::from_secs(2));
    }
}
