//! # Detector Configuration
//!
//! Configuration for the suspicious-activity detector: how far back to look,
//! and how many requests are tolerable over that span. Think of this as the
//! "sensitivity dial" of the detector.
//!
//! ## The Admission Rule
//!
//! ```text
//!     Sliding-Window Threshold:
//!
//!     ┌──────────────────────────────────────┐
//!     │ window: 10s                          │ ← how far back we look
//!     │ rate_limit: 2.0 req/s                │ ← tolerated steady rate
//!     │                                      │
//!     │ threshold = 2.0 × 10 = 20 requests   │ ← max per trailing window
//!     └──────────────────────────────────────┘
//!
//!     Timeline (window sliding right with each request):
//!
//!       t-10s ─────────────────────────── now
//!         [  x  x   x    x x x  x   ... n ]
//!                                        ▲
//!           n+1 > threshold?  ──► suspicious, entity is blocked
//! ```
//!
//! A request is suspicious when admitting it would put the trailing-window
//! count *above* the threshold. Landing exactly on the threshold is still
//! allowed.

use std::time::Duration;
use thiserror::Error;

/// Default monitoring window: ten seconds.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Default tolerated rate: two requests per second.
///
/// Combined with [`DEFAULT_WINDOW`] this yields a threshold of 20 requests
/// per trailing window.
pub const DEFAULT_RATE_LIMIT: f64 = 2.0;

/// Reasons a configuration is rejected at construction.
///
/// Validation runs eagerly, so a detector is never built from a bad
/// configuration and none of these can surface at request time.
///
/// # Example
///
/// ```rust
/// use sentinel::{ConfigError, SentinelConfig};
/// use std::time::Duration;
///
/// let config = SentinelConfig::new(Duration::ZERO, 2.0);
/// assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The monitoring window has zero length.
    #[error("monitoring window must be longer than zero")]
    ZeroWindow,

    /// The rate limit is zero, negative, or not a finite number.
    #[error("rate limit must be a positive, finite number of requests per second")]
    InvalidRateLimit,

    /// The window and rate limit combine to a threshold below one request,
    /// which would flag every request including an entity's very first.
    #[error("threshold of {0:.3} requests per window is below the minimum of 1")]
    ThresholdBelowOne(f64),
}

/// Configuration for a detector instance.
///
/// Both knobs are fixed for the lifetime of the detector that consumes them.
/// The threshold is computed once at construction and carried verbatim, so
/// [`SentinelConfig::per_window`] budgets are exact rather than reconstituted
/// from a rounded rate.
///
/// ## Examples
///
/// ```rust
/// use sentinel::SentinelConfig;
/// use std::time::Duration;
///
/// // Explicit window and rate
/// let config = SentinelConfig::new(Duration::from_secs(10), 2.0);
/// assert_eq!(config.threshold(), 20.0);
///
/// // "At most N requests in any trailing window"
/// let config = SentinelConfig::per_window(100, Duration::from_secs(60));
/// assert_eq!(config.threshold(), 100.0);
///
/// // Combinator style
/// let config = SentinelConfig::default()
///     .with_window(Duration::from_secs(30))
///     .with_rate_limit(0.5);
/// assert_eq!(config.threshold(), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Trailing window over which requests are counted.
    window: Duration,

    /// Tolerated steady-state rate in requests per second.
    rate_limit: f64,

    /// Per-window budget, fixed when the knobs are set.
    threshold: f64,
}

impl Default for SentinelConfig {
    /// Ten-second window at 2 requests/second, a threshold of 20 requests
    /// per trailing window.
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_RATE_LIMIT)
    }
}

impl SentinelConfig {
    /// Creates a configuration from an explicit window and rate.
    ///
    /// # Arguments
    ///
    /// * `window` - Trailing window length
    /// * `rate_limit` - Tolerated requests per second
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::SentinelConfig;
    /// use std::time::Duration;
    ///
    /// // 2 req/s over 10s: the 21st request inside a window trips
    /// let config = SentinelConfig::new(Duration::from_secs(10), 2.0);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(window: Duration, rate_limit: f64) -> Self {
        Self {
            window,
            rate_limit,
            threshold: rate_limit * window.as_secs_f64(),
        }
    }

    /// Creates a configuration tolerating at most `max_requests` within any
    /// trailing `window`.
    ///
    /// This is the natural phrasing for burst budgets: the threshold is
    /// `max_requests` exactly, and the rate limit is derived from it. The
    /// budget is carried as-is rather than recomputed from the derived rate,
    /// so windows that don't divide `max_requests` evenly (say 2 requests
    /// per 49 seconds) still admit exactly `max_requests`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::SentinelConfig;
    /// use std::time::Duration;
    ///
    /// // At most 10 requests in any 60-second span
    /// let config = SentinelConfig::per_window(10, Duration::from_secs(60));
    /// assert_eq!(config.threshold(), 10.0);
    /// ```
    pub fn per_window(max_requests: u32, window: Duration) -> Self {
        Self {
            window,
            rate_limit: f64::from(max_requests) / window.as_secs_f64(),
            threshold: f64::from(max_requests),
        }
    }

    /// Replaces the monitoring window, recomputing the threshold.
    pub fn with_window(self, window: Duration) -> Self {
        Self::new(window, self.rate_limit)
    }

    /// Replaces the tolerated rate, recomputing the threshold.
    pub fn with_rate_limit(self, rate_limit: f64) -> Self {
        Self::new(self.window, rate_limit)
    }

    /// Trailing window over which requests are counted.
    ///
    /// Longer windows smooth out bursts; shorter windows react faster.
    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Tolerated steady-state rate in requests per second.
    #[inline]
    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }

    /// Maximum admissible requests within one trailing window.
    ///
    /// Set at construction as `rate_limit * window` (or verbatim by
    /// [`SentinelConfig::per_window`]); a count *above* this value is
    /// suspicious. The value is fractional when the knobs don't multiply to
    /// a whole number: a threshold of `1.5` admits 1 request per window
    /// and flags the 2nd.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::SentinelConfig;
    /// use std::time::Duration;
    ///
    /// let config = SentinelConfig::new(Duration::from_secs(3), 0.5);
    /// assert_eq!(config.threshold(), 1.5);
    /// ```
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The admission rule: is a trailing-window count of
    /// `count_including_new` requests suspicious?
    ///
    /// The count must already include the request under evaluation; the
    /// caller adds it, since the new request is by definition "now" and
    /// never stored before the decision.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::SentinelConfig;
    /// use std::time::Duration;
    ///
    /// let config = SentinelConfig::per_window(20, Duration::from_secs(10));
    /// assert!(!config.is_suspicious(20)); // on the threshold: allowed
    /// assert!(config.is_suspicious(21)); // above it: suspicious
    /// ```
    #[inline]
    pub fn is_suspicious(&self, count_including_new: usize) -> bool {
        count_including_new as f64 > self.threshold()
    }

    /// Validates the configuration.
    ///
    /// Called automatically when constructing a detector; call it directly
    /// when accepting knobs from an external source.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ZeroWindow`] - the window has zero length
    /// * [`ConfigError::InvalidRateLimit`] - the rate is not positive and finite
    /// * [`ConfigError::ThresholdBelowOne`] - the combined threshold is
    ///   below one request per window, so even a first request would be
    ///   flagged
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::SentinelConfig;
    /// use std::time::Duration;
    ///
    /// let config = SentinelConfig::new(Duration::from_millis(100), 2.0);
    /// assert!(config.validate().is_err()); // threshold would be 0.2
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }

        if !self.rate_limit.is_finite() || self.rate_limit <= 0.0 {
            return Err(ConfigError::InvalidRateLimit);
        }

        // A threshold under 1 would flag an entity's very first request.
        let threshold = self.threshold();
        if threshold < 1.0 {
            return Err(ConfigError::ThresholdBelowOne(threshold));
        }

        Ok(())
    }
}
