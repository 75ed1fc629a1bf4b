//! Clock abstraction
//!
//! Expiry is a pure function of `(expires_at, now)` evaluated at each check;
//! there is no background timer or sweeper. The engine never reads the wall
//! clock directly - it goes through this trait so embedders and tests can
//! supply their own time source.

use firewall_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time in epoch milliseconds.
///
/// Implementations must be monotonically non-decreasing for the invariants
/// around expiry to hold.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis().max(0) as Timestamp
    }
}

/// Manually advanced clock for tests and deterministic embedders.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Jump to an absolute time. Going backwards is not prevented here;
    /// callers own the monotonicity requirement.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Advance by a delta.
    pub fn advance(&self, delta: Timestamp) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
