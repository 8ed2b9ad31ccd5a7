//! # Sentinel - Sliding-Window Abuse Detection for Rust
//!
//! A fast, concurrent library that watches per-entity request rates and blocks
//! entities that misbehave. Think of it as a security guard with a clipboard:
//! it remembers who asked for what recently, and anyone who asks too often
//! gets turned away until a human lets them back in.
//!
//! ## What is Suspicious-Activity Detection?
//!
//! Rate limiting answers "may this request proceed right now?" and forgets.
//! Detection answers a harsher question: "has this entity crossed the line?"
//! Once an entity trips the threshold it is blocked outright, and it stays
//! blocked until an operator unblocks it. No cooldown, no automatic pardon.
//!
//! ## The Sliding Window
//!
//! Every entity gets its own trailing window of request timestamps:
//!
//! ```text
//!     Detection Timeline (threshold = 20 requests per 10s window):
//!
//!     Entity A:  ✅ ✅ ✅ ... ✅          20 requests spread over 10s
//!                              ⛔        21st lands in-window → BLOCKED
//!                ✕  ✕  ✕                rejected from here on, forever
//!                          🔓 unblock("A")
//!                ✅                      clean slate, admitted again
//! ```
//!
//! - **Window** = How far back the detector looks (e.g. 10 seconds)
//! - **Rate limit** = Tolerated steady rate (e.g. 2 requests/second)
//! - **Threshold** = `rate × window`, the per-window budget (e.g. 20)
//!
//! A request is suspicious when admitting it would push the window count
//! *above* the threshold. Landing exactly on the threshold is fine.
//!
//! ## Features
//!
//! - 🔍 **Per-Entity Windows** - Every key (IP, device, account) is judged on its own history
//! - 🚫 **Sticky Blocks** - Blocked entities stay blocked until explicitly unblocked
//! - ⚡ **Sharded Concurrency** - Lock-free lookups, one short mutex per entity
//! - 🕐 **Pluggable Time** - Wall clock by default, a hand-driven clock for tests
//! - 📊 **Introspection** - Per-entity snapshots and aggregate statistics
//! - 🛡️ **Thread-Safe** - Share one detector across threads via `Arc`
//!
//! ## Quick Start
//!
//! ### Basic Detection
//!
//! ```rust
//! use sentinel::Sentinel;
//! use std::time::Duration;
//!
//! // Flag any entity making more than 20 requests in a 10-second window:
//! // - window of 10 seconds
//! // - tolerated rate of 2 requests/second
//! let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
//!
//! // In your request handler:
//! if sentinel.process("203.0.113.7").is_admitted() {
//!     println!("✅ Request admitted - processing...");
//!     // Your request handling code here
//! } else {
//!     println!("⛔ Suspicious - entity is blocked");
//!     // Return 429 / drop the connection / page someone
//! }
//! ```
//!
//! ### Advanced Usage with Builder Pattern
//!
//! ```rust
//! use sentinel::SentinelBuilder;
//! use std::time::Duration;
//!
//! let sentinel = SentinelBuilder::new()
//!     .window(Duration::from_secs(60))   // Look back one minute
//!     .rate_limit(0.5)                   // Tolerate 30 requests per minute
//!     .build::<&str>();
//!
//! assert_eq!(sentinel.threshold(), 30.0);
//! # sentinel.process("x");
//! ```
//!
//! ### Deterministic Time for Tests
//!
//! ```rust
//! use sentinel::{ManualClock, Outcome, Sentinel, SentinelConfig};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let config = SentinelConfig::per_window(3, Duration::from_secs(60));
//! let sentinel = Sentinel::with_clock(config, clock.clone());
//!
//! for _ in 0..3 {
//!     assert_eq!(sentinel.process("login:alice"), Outcome::Admitted);
//!     clock.advance(Duration::from_secs(1));
//! }
//! // Fourth attempt within the minute goes over the threshold of 3
//! assert_eq!(sentinel.process("login:alice"), Outcome::Blocked);
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │   Your Application      │
//!                    └──────────┬──────────────┘
//!                               │
//!                    ┌──────────▼──────────────┐
//!                    │      Sentinel API       │
//!                    ├─────────────────────────┤
//!                    │  • process()            │
//!                    │  • block() / unblock()  │
//!                    │  • snapshot() / stats() │
//!                    └──────────┬──────────────┘
//!                               │
//!                ┌──────────────┴───────────────┐
//!                │                              │
//!     ┌──────────▼──────────┐       ┌──────────▼───────────┐
//!     │   Entity Registry   │       │    Entity State      │
//!     ├─────────────────────┤       ├──────────────────────┤
//!     │ • Sharded map       │       │ • Active + history   │
//!     │ • One lock/entity   │       │ • Blocked (sticky)   │
//!     │ • Never evicts      │       │ • Lazy window prune  │
//!     └─────────────────────┘       └──────────────────────┘
//! ```
//!
//! ## State Transitions
//!
//! | From | Event | To | Outcome |
//! |------|-------|----|---------|
//! | (unseen) | request within budget | active | `Admitted` |
//! | active | request within budget | active | `Admitted` |
//! | active | request over threshold | blocked | `Blocked` |
//! | blocked | any request | blocked | `Rejected` |
//! | blocked | `unblock()` | active, clean history | - |
//! | any | `block()` | blocked | - |
//!
//! The request that trips a block is itself not admitted, and blocking
//! discards the entity's history; an unblocked entity starts from zero.
//!
//! ## Common Use Cases
//!
//! 1. **Brute-Force Login Detection** - Block accounts or IPs hammering authentication
//! 2. **API Abuse Detection** - Catch scrapers and runaway clients
//! 3. **IoT Fleet Protection** - Quarantine devices stuck in request loops
//! 4. **Fraud Screening** - Flag cards or accounts with bursty attempts
//! 5. **Spam Control** - Stop senders that exceed sane message rates
//!
//! ## Thread Safety
//!
//! All types are thread-safe and can be shared across threads:
//! - `Sentinel` - Safe to share via `Arc<Sentinel<K>>` (see [`SharedSentinel`])
//! - Distinct entities are judged in parallel; requests for one entity are
//!   serialized, so counts are exact even under contention
//!
//! ## Time
//!
//! Choose how requests are stamped:
//! - `process(key)` - Uses the detector's own [`MonotonicClock`]
//! - `process_request(key, at)` - You supply the timestamp; useful for
//!   replaying logs or running the detector on event time
//! - [`ManualClock`] - Hand-driven clock for deterministic tests
//!
//! ## Examples
//!
//! See the `demos/` directory for complete examples:
//! - `basic.rs` - Walk through admission, blocking, and recovery
//! - `device_simulation.rs` - A fleet of devices with one noisy neighbor
//!
//! ## Safety
//!
//! This crate contains no `unsafe` code (`#![forbid(unsafe_code)]`).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

// Internal module
mod detector;

// Public re-exports
pub use detector::{
    Clock, ConfigError, EntityReport, EntityStatus, ManualClock, MonotonicClock, Outcome,
    Sentinel, SentinelConfig, SentinelStats, Timestamp, DEFAULT_RATE_LIMIT, DEFAULT_WINDOW,
};

/// A detector wrapped in `Arc` for convenient thread-safe sharing.
///
/// # Example
/// ```rust
/// use sentinel::{Sentinel, SharedSentinel};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
/// let shared: SharedSentinel<&'static str> = Arc::new(sentinel);
///
/// // Now you can clone and share across threads
/// let worker = shared.clone();
/// let handle = std::thread::spawn(move || {
///     worker.process("10.0.0.1");
/// });
/// handle.join().unwrap();
/// assert_eq!(shared.tracked_entities(), 1);
/// ```
pub type SharedSentinel<K> = std::sync::Arc<Sentinel<K>>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported Rust version.
///
/// This crate requires at least Rust 1.70.0 due to:
/// - Edition 2021 features
/// - Modern `Duration` and atomic APIs
pub const MSRV: &str = "1.70.0";

/// Prelude module for convenient imports.
///
/// Import everything you need with a single line:
/// ```rust
/// use sentinel::prelude::*;
/// ```
pub mod prelude {
    //! Common imports for typical detection use cases.
    //!
    //! # Example
    //! ```rust
    //! use sentinel::prelude::*;
    //! use std::time::Duration;
    //!
    //! let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
    //! let outcome = sentinel.process("10.0.0.1");
    //! assert_eq!(outcome, Outcome::Admitted);
    //! ```

    pub use crate::{
        Clock, ConfigError, EntityReport, EntityStatus, ManualClock, MonotonicClock, Outcome,
        Sentinel, SentinelBuilder, SentinelConfig, SentinelStats, SharedSentinel, Timestamp,
    };
}

/// Builder pattern for creating detectors with custom configuration.
///
/// The builder provides a fluent API for constructing detectors with
/// validated configuration. This is the recommended way to create detectors
/// with non-default settings.
///
/// # Example
///
/// ```rust
/// use sentinel::SentinelBuilder;
/// use std::time::Duration;
///
/// // Flag entities exceeding 30 requests per minute
/// let sentinel = SentinelBuilder::new()
///     .window(Duration::from_secs(60))
///     .rate_limit(0.5)
///     .build::<String>();
///
/// assert_eq!(sentinel.threshold(), 30.0);
///
/// // Or use try_build() for error handling
/// let result = SentinelBuilder::new()
///     .rate_limit(0.0) // Invalid!
///     .try_build::<String>();
///
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SentinelBuilder {
    config: SentinelConfig,
}

impl SentinelBuilder {
    /// Creates a new builder with default configuration.
    ///
    /// Default configuration:
    /// - 10-second monitoring window
    /// - 2 requests/second tolerated rate
    /// - threshold of 20 requests per window
    pub fn new() -> Self {
        Self {
            config: SentinelConfig::default(),
        }
    }

    /// Sets the monitoring window.
    ///
    /// This is how far back the detector looks when counting an entity's
    /// requests. Longer windows smooth out bursts; shorter windows react
    /// faster.
    ///
    /// # Arguments
    ///
    /// * `window` - Trailing window length (must be non-zero)
    pub fn window(mut self, window: std::time::Duration) -> Self {
        self.config = self.config.with_window(window);
        self
    }

    /// Sets the tolerated steady-state rate.
    ///
    /// Combined with the window this fixes the threshold: an entity whose
    /// window count would exceed `rate_limit * window` is blocked.
    ///
    /// # Arguments
    ///
    /// * `rate_limit` - Requests per second (must be positive and finite)
    pub fn rate_limit(mut self, rate_limit: f64) -> Self {
        self.config = self.config.with_rate_limit(rate_limit);
        self
    }

    /// Builds the detector with the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid:
    /// - the window is zero
    /// - the rate limit is non-positive or non-finite
    /// - the combined threshold is below one request per window
    ///
    /// Use `try_build()` if you want to handle errors.
    pub fn build<K: Eq + std::hash::Hash + Clone + std::fmt::Debug>(self) -> Sentinel<K> {
        Sentinel::with_config(self.config)
    }

    /// Attempts to build the detector, returning an error if invalid.
    ///
    /// This is the safe version that returns a `Result` instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] describing what is wrong with the
    /// configuration.
    pub fn try_build<K: Eq + std::hash::Hash + Clone + std::fmt::Debug>(
        self,
    ) -> Result<Sentinel<K>, ConfigError> {
        self.config.validate()?;
        Ok(Sentinel::with_config(self.config))
    }
}

impl Default for SentinelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
