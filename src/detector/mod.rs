//! # Detector Module
//!
//! This module provides the internal implementation of the suspicious-activity
//! detector. It's organized into several submodules, each responsible for a
//! specific aspect of the detection system.
//!
//! ## Module Structure
//!
//! ```text
//!     detector/
//!     ├── mod.rs          (You are here - Module organization)
//!     ├── clock.rs        (Time sources: wall clock and manual clock)
//!     ├── config.rs       (Window / rate knobs and validation)
//!     ├── history.rs      (Per-entity sliding window of timestamps)
//!     ├── entity.rs       (Active/blocked state machine)
//!     ├── registry.rs     (Keyed registry and request judgement)
//!     └── snapshot.rs     (Per-entity reports and aggregate stats)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     Request (key, timestamp)
//!          │
//!          ▼
//!     ┌──────────┐
//!     │ Registry │ ◄── Per-entity records, one lock each
//!     └────┬─────┘
//!          │
//!          ▼
//!     ┌──────────┐
//!     │  Entity  │ ◄── Active or blocked?
//!     └────┬─────┘
//!          │
//!          ▼
//!     ┌──────────┐
//!     │ History  │ ◄── Trailing-window count
//!     └────┬─────┘
//!          │
//!          ▼
//!     ┌──────────┐
//!     │  Config  │ ◄── Over the threshold?
//!     └──────────┘
//! ```
//!
//! ## Component Responsibilities
//!
//! - **clock**: Supplies timestamps (monotonic wall clock, or hand-driven for tests)
//! - **config**: Defines what counts as suspicious (window length, tolerated rate)
//! - **history**: Stores recent request timestamps and prunes stale ones lazily
//! - **entity**: Holds each entity's active-or-blocked state
//! - **registry**: Routes requests to entities and applies block/unblock decisions
//! - **snapshot**: Read-only views for operators and dashboards

// Declare submodules (internal organization)
mod clock;
mod config;
mod entity;
mod history;
mod registry;
mod snapshot;

// Re-export public types for external use
// These are the types that users of the library will interact with

/// Time sources and the timestamp type requests are stamped with
pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};

/// Configuration types for tuning detection sensitivity
pub use config::{ConfigError, SentinelConfig, DEFAULT_RATE_LIMIT, DEFAULT_WINDOW};

/// Per-request outcome reported by the detector
pub use entity::Outcome;

/// The keyed detector itself
pub use registry::Sentinel;

/// Read-only views: per-entity reports and aggregate statistics
pub use snapshot::{EntityReport, EntityStatus, SentinelStats};
