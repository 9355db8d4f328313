//! Wall-clock timestamps and epoch-anchored window alignment.
//!
//! Timestamps are milliseconds since the Unix epoch. Window boundaries are
//! multiples of the granularity counted from that epoch, so two stores with
//! the same granularity always agree on which window an instant falls into,
//! independent of when either store was started.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The epoch itself.
    pub const EPOCH: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert a `SystemTime`; instants before the epoch become negative.
    pub fn from_system_time(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(duration_millis(d)),
            Err(e) => Self(duration_millis(e.duration()).saturating_neg()),
        }
    }

    /// Floor to the start of the window containing this instant.
    ///
    /// Uses the Euclidean remainder so pre-epoch instants still round down.
    pub fn align(self, granularity: Duration) -> Self {
        let g = duration_millis(granularity).max(1);
        Self(self.0.saturating_sub(self.0.rem_euclid(g)))
    }

    pub fn saturating_sub(self, d: Duration) -> Self {
        Self(self.0.saturating_sub(duration_millis(d)))
    }

    /// `self - n * step`, saturating.
    pub fn step_back(self, step: Duration, n: usize) -> Self {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        Self(self.0.saturating_sub(duration_millis(step).saturating_mul(n)))
    }

    /// Signed distance from `origin` to `self`, in fractional minutes.
    pub fn minutes_since(self, origin: Timestamp) -> f64 {
        self.0.saturating_sub(origin.0) as f64 / 60_000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Millisecond length of a duration, clamped to `i64`.
pub fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
