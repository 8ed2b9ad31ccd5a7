//! # Request History
//!
//! Per-entity store of request timestamps, ordered oldest-to-newest. The
//! trailing window is maintained lazily: stale entries are dropped whenever
//! the window count is taken, so an idle entity costs nothing until it is
//! next looked at.

use super::clock::Timestamp;
use std::collections::VecDeque;
use std::time::Duration;

/// Timestamps of an entity's recent requests.
///
/// Appends happen in evaluation order, so with a well-behaved clock the
/// deque is sorted oldest-first. Pruning does not rely on that: every entry
/// is tested against the window, so a clock that steps backwards between
/// evaluations cannot hide a stale entry behind a future-dated one.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestHistory {
    samples: VecDeque<Timestamp>,
}

impl RequestHistory {
    /// Creates an empty history.
    pub(crate) fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Records an admitted request.
    pub(crate) fn append(&mut self, at: Timestamp) {
        self.samples.push_back(at);
    }

    /// Counts requests still inside the trailing window ending at `now`,
    /// discarding older entries as a side effect.
    ///
    /// The boundary is inclusive: an entry exactly `window` old still
    /// counts. Entries that appear to be from the future (a clock that
    /// stepped backwards between evaluations) are kept rather than guessed
    /// at; they age out once the clock catches back up.
    ///
    /// The count covers stored requests only. A request currently under
    /// evaluation is not yet stored, so callers add it themselves.
    pub(crate) fn windowed_count(&mut self, now: Timestamp, window: Duration) -> usize {
        self.samples.retain(|&at| match now.checked_sub(at) {
            Some(age) => age <= window,
            // From the future: keep it.
            None => true,
        });

        self.samples.len()
    }

    /// Number of retained samples, without pruning.
    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }
}
