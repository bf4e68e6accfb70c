#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

use super::TimeSource;

/// The system wall clock, optionally shifted by a fixed offset.
///
/// The offset is added to every sample before it reaches the generator. It
/// lets a deployment pin ids to a fixed time-zone offset; it never changes the
/// generation algorithm itself.
///
/// Clocks set before 1970 report negative values instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock {
    offset_millis: i64,
}

impl SystemClock {
    /// A clock reporting UTC.
    #[must_use]
    pub const fn new() -> Self {
        Self { offset_millis: 0 }
    }

    /// A clock reporting UTC shifted by `offset_millis`.
    #[must_use]
    pub const fn with_offset(offset_millis: i64) -> Self {
        Self { offset_millis }
    }

    /// The configured offset in milliseconds.
    #[must_use]
    pub const fn offset_millis(&self) -> i64 {
        self.offset_millis
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map_or(i64::MIN, |ms| -ms),
        };
        now.saturating_add(self.offset_millis)
    }
}

/// A clock frozen at a single instant.
///
/// Every id produced against a fixed clock lands in the same millisecond, so
/// generators advance virtual time once the counter space is used up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    /// A clock that always reports `millis` since the Unix epoch.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl TimeSource for FixedClock {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}
