use alloc::{rc::Rc, sync::Arc};
use core::time::Duration;

/// Default custom epoch: Sunday, January 1, 2023 00:00:00 UTC.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_672_531_200_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock, a clock shifted by
/// a fixed offset, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. Generators subtract
/// their custom epoch themselves, so a time source never needs to know about
/// it. Values may go backwards; generators compensate.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Rc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// Converts an epoch expressed as a [`Duration`] since 1970-01-01 UTC into
/// signed milliseconds, saturating at [`i64::MAX`].
#[must_use]
pub fn epoch_millis(epoch: Duration) -> i64 {
    i64::try_from(epoch.as_millis()).unwrap_or(i64::MAX)
}
