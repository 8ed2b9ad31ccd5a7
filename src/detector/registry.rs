//! # Entity Registry
//!
//! The detector core: one [`Sentinel`] owns every tracked entity and judges
//! each request under that entity's lock.
//!
//! ## Concurrency Model
//!
//! ```text
//!     ┌───────────────────────────────────────────────┐
//!     │                 Sentinel<K>                   │
//!     │                                               │
//!     │   DashMap (sharded)                           │
//!     │   ┌────────┬────────┬─────────┬────────┐      │
//!     │   │ shard 0│ shard 1│   ...   │ shard n│      │
//!     │   └───┬────┴───┬────┴─────────┴───┬────┘      │
//!     │       │        │                  │           │
//!     │       ▼        ▼                  ▼           │
//!     │   Arc<Mutex<EntityState>>   one per entity    │
//!     └───────────────────────────────────────────────┘
//!
//!     Request flow:
//!       1. look up (or create) the entity's record    [shard lock]
//!       2. judge and update under the entity's mutex  [entity lock]
//! ```
//!
//! The shard lock is held only for the lookup; the decision itself runs
//! under the per-entity mutex, so the count-judge-store sequence is atomic
//! per entity while distinct entities proceed in parallel. Locks are taken
//! shard first, entity second, never the other way around.
//!
//! Records are never evicted. An entity stays tracked, and a blocked entity
//! stays blocked, until an operator says otherwise.

use super::clock::{Clock, MonotonicClock, Timestamp};
use super::config::SentinelConfig;
use super::entity::{EntityState, Outcome};
use super::snapshot::{EntityReport, SentinelStats};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::available_parallelism;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Initial registry capacity, spread across shards.
const INITIAL_TRACKED_ENTITIES: usize = 1_024;

/// Shared handle to one entity's state.
type Record = Arc<Mutex<EntityState>>;

/// Sliding-window suspicious-activity detector keyed by entity.
///
/// A `Sentinel` watches request timestamps per entity (an IP address, a
/// device id, an account name) and blocks any entity whose trailing-window
/// request count exceeds the configured threshold. Blocked entities are
/// rejected outright until explicitly unblocked.
///
/// ## Features
///
/// - 🔍 **Per-entity windows** - entities are judged independently
/// - 🚫 **Sticky blocks** - no automatic expiry, unblocking is an operator act
/// - ⚡ **Lock-free lookups** - sharded map, one short mutex per entity
/// - 🕐 **Pluggable time** - wall clock by default, manual clock for tests
/// - 📊 **Introspection** - per-entity snapshots and aggregate stats
///
/// ## Example
///
/// ```rust
/// use sentinel::{Outcome, Sentinel};
/// use std::time::Duration;
///
/// // Tolerate 2 requests in any 1-second window
/// let sentinel = Sentinel::new(Duration::from_secs(1), 2.0);
///
/// let t = Duration::from_millis;
/// assert_eq!(sentinel.process_request("10.0.0.9", t(0)), Outcome::Admitted);
/// assert_eq!(sentinel.process_request("10.0.0.9", t(400)), Outcome::Admitted);
/// // A third request inside the window goes over the threshold of 2
/// assert_eq!(sentinel.process_request("10.0.0.9", t(800)), Outcome::Blocked);
/// // The entity is now blocked outright, no matter how much time passes
/// assert_eq!(sentinel.process_request("10.0.0.9", t(90_000)), Outcome::Rejected);
/// ```
pub struct Sentinel<K, C = MonotonicClock> {
    /// Per-entity records, sharded by key hash.
    records: DashMap<K, Record, ahash::RandomState>,

    /// Window and rate knobs, fixed at construction.
    config: SentinelConfig,

    /// Time source for [`Sentinel::process`].
    clock: C,

    /// Entities currently blocked.
    blocked_count: AtomicUsize,

    /// Requests admitted and recorded.
    total_admitted: AtomicU64,

    /// Requests that tripped a block.
    total_tripped: AtomicU64,

    /// Requests rejected because their entity was already blocked.
    total_rejected: AtomicU64,
}

impl<K: Eq + Hash + Clone + fmt::Debug> Sentinel<K> {
    /// Creates a detector with the given window and tolerated rate, timed
    /// by the wall clock.
    ///
    /// # Arguments
    ///
    /// * `window` - Trailing window over which requests are counted
    /// * `rate_limit` - Tolerated requests per second
    ///
    /// # Panics
    ///
    /// Panics if the combination is invalid (zero window, non-positive or
    /// non-finite rate, or a threshold below one request per window). Use
    /// [`SentinelConfig::validate`] first when the knobs come from an
    /// external source.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::Sentinel;
    /// use std::time::Duration;
    ///
    /// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
    /// assert!(sentinel.process("10.0.0.1").is_admitted());
    /// ```
    pub fn new(window: Duration, rate_limit: f64) -> Self {
        Self::with_config(SentinelConfig::new(window, rate_limit))
    }

    /// Creates a detector from a prepared configuration, timed by the wall
    /// clock.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`SentinelConfig::validate`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{Sentinel, SentinelConfig};
    /// use std::time::Duration;
    ///
    /// let config = SentinelConfig::per_window(100, Duration::from_secs(60));
    /// let sentinel = Sentinel::with_config(config);
    /// assert_eq!(sentinel.threshold(), 100.0);
    /// # sentinel.process("10.0.0.1");
    /// ```
    pub fn with_config(config: SentinelConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug, C: Clock> Sentinel<K, C> {
    /// Creates a detector driven by an explicit time source.
    ///
    /// This is how tests take control of time: pair the detector with a
    /// [`ManualClock`](crate::ManualClock) and advance it by hand.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`SentinelConfig::validate`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{ManualClock, Outcome, Sentinel, SentinelConfig};
    /// use std::time::Duration;
    ///
    /// let clock = ManualClock::new();
    /// let config = SentinelConfig::per_window(1, Duration::from_secs(10));
    /// let sentinel = Sentinel::with_clock(config, clock.clone());
    ///
    /// assert_eq!(sentinel.process("sensor-7"), Outcome::Admitted);
    /// clock.advance(Duration::from_secs(5));
    /// assert_eq!(sentinel.process("sensor-7"), Outcome::Blocked);
    /// ```
    pub fn with_clock(config: SentinelConfig, clock: C) -> Self {
        config.validate().expect("invalid sentinel configuration");

        // Scale shard count with CPU cores to spread lookup contention.
        // DashMap requires a power of two; cap at 64 for memory efficiency.
        let num_shards = available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8)
            .next_power_of_two()
            .clamp(4, 64);

        // Pre-size for expected load distribution across shards
        let initial_capacity = (INITIAL_TRACKED_ENTITIES / num_shards).max(16);

        Self {
            records: DashMap::with_capacity_and_hasher_and_shard_amount(
                initial_capacity,
                ahash::RandomState::new(),
                num_shards,
            ),
            config,
            clock,
            blocked_count: AtomicUsize::new(0),
            total_admitted: AtomicU64::new(0),
            total_tripped: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
        }
    }

    /// Looks up the record for `key`, creating a fresh active one on first
    /// sighting.
    fn record_for(&self, key: &K) -> Record {
        // Fast path: entity already tracked. This is the common case and
        // avoids any allocation.
        if let Some(record) = self.records.get(key) {
            return Arc::clone(record.value());
        }

        // Slow path: first sighting. The entry API arbitrates racing
        // creators so exactly one record survives.
        match self.records.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let record: Record = Arc::new(Mutex::new(EntityState::fresh()));
                vacant.insert(Arc::clone(&record));
                debug!("Tracking new entity {:?} (tracked: {})", key, self.records.len());
                record
            }
        }
    }

    /// Judges one request from `key` stamped with the detector's own clock.
    ///
    /// Shorthand for [`Sentinel::process_request`] with `self.clock.now()`.
    #[inline]
    pub fn process(&self, key: K) -> Outcome {
        self.process_request(key, self.clock.now())
    }

    /// Judges one request from `key` at timestamp `at`.
    ///
    /// The rule: the request is suspicious if admitting it would put the
    /// entity's trailing-window count *above* `rate_limit * window`. The
    /// request under evaluation always counts as one of those requests, so
    /// an entity's very first request is judged as a count of 1.
    ///
    /// | Entity state | Window check | Outcome                          |
    /// |--------------|--------------|----------------------------------|
    /// | blocked      | skipped      | [`Outcome::Rejected`]            |
    /// | active       | over         | [`Outcome::Blocked`], now sticky |
    /// | active       | within       | [`Outcome::Admitted`], recorded  |
    ///
    /// A request that trips the block is itself not admitted, and the
    /// entity's history is discarded with the transition.
    ///
    /// Timestamps are expected to be non-decreasing per entity but are not
    /// required to be: a request stamped earlier than a stored one (a clock
    /// that stepped backwards) is counted conservatively rather than
    /// dropped.
    ///
    /// # Arguments
    ///
    /// * `key` - The entity the request belongs to
    /// * `at` - When the request happened, on the same time base as the
    ///   rest of this entity's requests
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{Outcome, Sentinel, SentinelConfig};
    /// use std::time::Duration;
    ///
    /// let config = SentinelConfig::per_window(2, Duration::from_secs(10));
    /// let sentinel = Sentinel::with_config(config);
    ///
    /// let t = Duration::from_secs;
    /// assert_eq!(sentinel.process_request("card-42", t(1)), Outcome::Admitted);
    /// assert_eq!(sentinel.process_request("card-42", t(2)), Outcome::Admitted);
    /// assert_eq!(sentinel.process_request("card-42", t(3)), Outcome::Blocked);
    /// assert_eq!(sentinel.process_request("card-42", t(4)), Outcome::Rejected);
    /// ```
    #[inline]
    pub fn process_request(&self, key: K, at: Timestamp) -> Outcome {
        let record = self.record_for(&key);
        let mut guard = record.lock();
        let state = &mut *guard;

        match state {
            EntityState::Blocked => {
                self.total_rejected.fetch_add(1, Ordering::Relaxed);
                debug!("Rejecting request from blocked entity {:?}", key);
                Outcome::Rejected
            }
            EntityState::Active(history) => {
                // The request being judged counts toward the window.
                let seen = history.windowed_count(at, self.config.window()) + 1;

                if self.config.is_suspicious(seen) {
                    *state = EntityState::Blocked;
                    self.blocked_count.fetch_add(1, Ordering::AcqRel);
                    self.total_tripped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "Blocking entity {:?}: {} requests within {:?} (threshold: {})",
                        key,
                        seen,
                        self.config.window(),
                        self.config.threshold()
                    );
                    Outcome::Blocked
                } else {
                    history.append(at);
                    self.total_admitted.fetch_add(1, Ordering::Relaxed);
                    Outcome::Admitted
                }
            }
        }
    }

    /// Blocks `key` unconditionally, discarding any history it had.
    ///
    /// An entity that was never seen before becomes tracked and blocked.
    /// Blocking an already-blocked entity changes nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{Outcome, Sentinel};
    /// use std::time::Duration;
    ///
    /// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
    /// sentinel.block("badguy");
    /// assert_eq!(sentinel.process("badguy"), Outcome::Rejected);
    /// ```
    pub fn block(&self, key: K) {
        let record = self.record_for(&key);
        let mut guard = record.lock();

        if guard.block() {
            self.blocked_count.fetch_add(1, Ordering::AcqRel);
            info!("Entity {:?} blocked by operator", key);
        }
    }

    /// Lifts the block on `key`, restoring it to active with a clean
    /// history.
    ///
    /// Blocks never expire on their own; this is the only way back. An
    /// entity that was never seen before becomes tracked and active, and
    /// unblocking an already-active entity changes nothing, so the call is
    /// safe to repeat.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{Outcome, Sentinel};
    /// use std::time::Duration;
    ///
    /// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
    /// sentinel.block("10.0.0.1");
    /// sentinel.unblock("10.0.0.1");
    /// assert_eq!(sentinel.process("10.0.0.1"), Outcome::Admitted);
    /// ```
    pub fn unblock(&self, key: K) {
        let record = self.record_for(&key);
        let mut guard = record.lock();

        if guard.unblock() {
            self.blocked_count.fetch_sub(1, Ordering::AcqRel);
            info!("Entity {:?} unblocked", key);
        }
    }

    /// Whether `key` is currently blocked.
    ///
    /// Never-seen entities read as not blocked; asking does not start
    /// tracking them.
    #[inline]
    pub fn is_blocked(&self, key: &K) -> bool {
        self.records
            .get(key)
            .map_or(false, |record| record.value().lock().is_blocked())
    }

    /// Point-in-time view of every tracked entity.
    ///
    /// Per-request counts are as of each entity's last evaluation; taking a
    /// snapshot does not advance any window. Entities are locked one at a
    /// time, so the map is not a single consistent cut across entities
    /// under concurrent traffic.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{EntityStatus, Sentinel};
    /// use std::time::Duration;
    ///
    /// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
    /// sentinel.process("10.0.0.1");
    /// sentinel.block("10.0.0.2");
    ///
    /// let snapshot = sentinel.snapshot();
    /// assert_eq!(snapshot["10.0.0.1"].status, EntityStatus::Active);
    /// assert_eq!(snapshot["10.0.0.1"].recent_requests, 1);
    /// assert_eq!(snapshot["10.0.0.2"].status, EntityStatus::Blocked);
    /// ```
    pub fn snapshot(&self) -> HashMap<K, EntityReport> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().lock().report()))
            .collect()
    }

    /// Aggregate counters for this detector.
    pub fn stats(&self) -> SentinelStats {
        SentinelStats {
            tracked_entities: self.records.len(),
            blocked_entities: self.blocked_count.load(Ordering::Acquire),
            total_admitted: self.total_admitted.load(Ordering::Relaxed),
            total_tripped: self.total_tripped.load(Ordering::Relaxed),
            total_rejected: self.total_rejected.load(Ordering::Relaxed),
        }
    }

    /// Number of entities ever seen by this detector.
    #[inline]
    pub fn tracked_entities(&self) -> usize {
        self.records.len()
    }

    /// Number of entities currently blocked.
    #[inline]
    pub fn blocked_entities(&self) -> usize {
        self.blocked_count.load(Ordering::Acquire)
    }

    /// The detector's configuration.
    #[inline]
    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    /// Maximum admissible requests within one trailing window.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.config.threshold()
    }
}

impl<K: Eq + Hash, C> fmt::Debug for Sentinel<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sentinel")
            .field("tracked_entities", &self.records.len())
            .field("blocked_entities", &self.blocked_count.load(Ordering::Acquire))
            .field("config", &self.config)
            .finish()
    }
}
