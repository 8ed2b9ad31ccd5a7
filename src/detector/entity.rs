//! # Entity State
//!
//! The per-entity state machine. An entity is either active, carrying the
//! history its next request will be judged against, or blocked, carrying
//! nothing. The two never coexist: blocking drops the history, and
//! unblocking starts a fresh one.
//!
//! ```text
//!                  suspicious request / block()
//!     ┌────────┐ ────────────────────────────────► ┌─────────┐
//!     │ Active │                                   │ Blocked │
//!     │(history)│ ◄──────────────────────────────── │(nothing)│
//!     └────────┘           unblock()               └─────────┘
//! ```

use super::history::RequestHistory;
use super::snapshot::{EntityReport, EntityStatus};

/// What happened to a processed request.
///
/// # Example
///
/// ```rust
/// use sentinel::{Outcome, Sentinel};
/// use std::time::Duration;
///
/// let sentinel = Sentinel::new(Duration::from_secs(10), 2.0);
/// let outcome = sentinel.process("10.0.0.1");
/// assert_eq!(outcome, Outcome::Admitted);
/// assert!(outcome.is_admitted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request was within budget and recorded.
    Admitted,

    /// The request pushed its entity over the threshold; the entity is now
    /// blocked and the request was not admitted.
    Blocked,

    /// The entity was already blocked; the request was turned away without
    /// being evaluated.
    Rejected,
}

impl Outcome {
    /// Whether the request went through.
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Outcome::Admitted)
    }
}

/// State of one tracked entity.
///
/// A blocked entity deliberately holds no history: whatever it did before
/// the block is irrelevant, and after an unblock it starts clean.
#[derive(Debug, Clone)]
pub(crate) enum EntityState {
    /// Accepting requests, judged against the attached history.
    Active(RequestHistory),

    /// Turned away unconditionally until unblocked.
    Blocked,
}

impl EntityState {
    /// A newly tracked entity: active, with nothing on record.
    pub(crate) fn fresh() -> Self {
        EntityState::Active(RequestHistory::new())
    }

    /// Forces the entity into the blocked state, discarding any history.
    ///
    /// Returns `true` if this changed anything.
    pub(crate) fn block(&mut self) -> bool {
        match self {
            EntityState::Blocked => false,
            EntityState::Active(_) => {
                *self = EntityState::Blocked;
                true
            }
        }
    }

    /// Restores the entity to active with an empty history.
    ///
    /// Returns `true` if this changed anything.
    pub(crate) fn unblock(&mut self) -> bool {
        match self {
            EntityState::Active(_) => false,
            EntityState::Blocked => {
                *self = EntityState::fresh();
                true
            }
        }
    }

    /// Whether the entity is currently blocked.
    pub(crate) fn is_blocked(&self) -> bool {
        matches!(self, EntityState::Blocked)
    }

    /// Point-in-time view of this entity for snapshots.
    pub(crate) fn report(&self) -> EntityReport {
        match self {
            EntityState::Active(history) => EntityReport {
                status: EntityStatus::Active,
                recent_requests: history.len(),
            },
            EntityState::Blocked => EntityReport {
                status: EntityStatus::Blocked,
                recent_requests: 0,
            },
        }
    }
}
