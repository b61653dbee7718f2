//! Clock abstraction for time-dependent logic.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Injected wherever "now" matters (cache TTL computation, the expiry
/// sweep) so tests can control time. The store and the cache must see the
/// same clock, otherwise their two expiry mechanisms drift apart.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
