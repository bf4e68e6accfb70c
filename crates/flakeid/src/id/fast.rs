use std::sync::OnceLock;

use portable_atomic::{AtomicU32, Ordering};

use super::SnowflakeId;
use crate::{
    rand::{RandomSource, ThreadRandom},
    time::{DEFAULT_EPOCH, SystemClock, TimeSource, epoch_millis},
};

/// Process-wide tail counter, seeded randomly on first use.
static FAST_COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl SnowflakeId {
    /// Returns an id from the system clock and a process-wide atomic counter,
    /// without a generator.
    ///
    /// The tail is the low 22 bits of a counter shared by every caller in the
    /// process, so ids are unique while fewer than 2^22 are taken per
    /// millisecond. Unlike a generator there is no node id, no clock-drift
    /// compensation, and no ordering guarantee within a millisecond once the
    /// counter wraps. The timestamp is relative to
    /// [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH).
    ///
    /// # Example
    /// ```
    /// use flakeid::SnowflakeId;
    ///
    /// let a = SnowflakeId::fast();
    /// let b = SnowflakeId::fast();
    /// assert_ne!(a, b);
    /// ```
    #[must_use]
    pub fn fast() -> Self {
        let counter =
            FAST_COUNTER.get_or_init(|| AtomicU32::new(ThreadRandom.next_int() as u32));
        let tail = counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        Self::from_clock_and_tail(SystemClock::new().current_millis(), tail)
    }

    /// Packs Unix milliseconds relative to the default epoch, clamped into
    /// the time field, with the low 22 bits of `tail`.
    fn from_clock_and_tail(unix_millis: i64, tail: u32) -> Self {
        let time = unix_millis
            .saturating_sub(epoch_millis(DEFAULT_EPOCH))
            .clamp(0, Self::MAX_TIME as i64) as u64;
        Self::from_raw((time << Self::TIME_SHIFT) | (u64::from(tail) & Self::TAIL_MASK))
    }
}
