//! # Snapshots and Statistics
//!
//! Read-only views of detector state: per-entity reports for inspecting
//! who is blocked and how busy each entity has been, plus aggregate
//! counters for dashboards and logs.

use std::fmt;

/// Whether an entity may currently send requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityStatus {
    /// Requests are evaluated against the entity's recent history.
    Active,

    /// Requests are rejected without evaluation.
    Blocked,
}

impl EntityStatus {
    /// Whether this status turns requests away.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, EntityStatus::Blocked)
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityStatus::Active => write!(f, "ACTIVE"),
            EntityStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// Point-in-time view of a single tracked entity.
///
/// Produced by [`Sentinel::snapshot`](crate::Sentinel::snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityReport {
    /// Whether the entity is active or blocked.
    pub status: EntityStatus,

    /// Requests retained in the entity's window as of its last evaluation.
    ///
    /// Taking a snapshot does not advance anyone's window, so this may
    /// include requests that would age out at the next evaluation. Blocked
    /// entities hold no history and always report zero.
    pub recent_requests: usize,
}

/// Aggregate counters for a detector instance.
///
/// # Example
///
/// ```rust
/// use sentinel::Sentinel;
/// use std::time::Duration;
///
/// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
/// sentinel.process("device-1");
/// sentinel.process("device-2");
///
/// let stats = sentinel.stats();
/// assert_eq!(stats.tracked_entities, 2);
/// assert_eq!(stats.total_admitted, 2);
/// println!("{}", stats.summary());
/// ```
#[derive(Debug, Clone)]
pub struct SentinelStats {
    /// Entities the detector has ever seen.
    pub tracked_entities: usize,

    /// Entities currently in the blocked state.
    pub blocked_entities: usize,

    /// Requests admitted and recorded.
    pub total_admitted: u64,

    /// Requests that tripped a block (each one blocked its entity).
    pub total_tripped: u64,

    /// Requests turned away because their entity was already blocked.
    pub total_rejected: u64,
}

impl SentinelStats {
    /// Total requests processed, regardless of outcome.
    pub fn total_requests(&self) -> u64 {
        self.total_admitted + self.total_tripped + self.total_rejected
    }

    /// Fraction of processed requests that were admitted, in `0.0..=1.0`.
    ///
    /// Reads as `1.0` before any request has been processed.
    pub fn admission_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            1.0
        } else {
            self.total_admitted as f64 / total as f64
        }
    }

    /// Human-readable multi-line summary.
    ///
    /// ```text
    /// Sentinel Stats:
    /// ├─ Entities: 4 tracked, 1 blocked
    /// ├─ Requests: 103 total
    /// │  ├─ Admitted: 98
    /// │  ├─ Tripped:  1
    /// │  └─ Rejected: 4
    /// └─ Admission rate: 95.15%
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "Sentinel Stats:\n\
             ├─ Entities: {} tracked, {} blocked\n\
             ├─ Requests: {} total\n\
             │  ├─ Admitted: {}\n\
             │  ├─ Tripped:  {}\n\
             │  └─ Rejected: {}\n\
             └─ Admission rate: {:.2}%",
            self.tracked_entities,
            self.blocked_entities,
            self.total_requests(),
            self.total_admitted,
            self.total_tripped,
            self.total_rejected,
            self.admission_rate() * 100.0,
        )
    }
}

impl fmt::Display for SentinelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
