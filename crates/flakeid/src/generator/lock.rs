use alloc::sync::Arc;
use core::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result, SnowflakeId,
    generator::{GeneratorConfig, SnowflakeGenerator, state::GeneratorState},
    mutex::{Mutex, lock},
    rand::{RandomSource, ThreadRandom},
    time::{SystemClock, TimeSource},
};

/// A lock-based Snowflake generator suitable for multi-threaded environments.
///
/// The generator state lives behind an [`Arc<Mutex<_>>`], so clones share it
/// and keep producing unique ids between them. Reading the clock, advancing
/// the counter and packing the id all happen inside one critical section, so
/// ids come out strictly increasing in lock-acquisition order.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Works on targets without 64-bit atomics
/// - ✅ Never blocks on the clock; exhausted milliseconds borrow from the
///   future
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
/// - [`GeneratorBuilder`]
///
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
/// [`GeneratorBuilder`]: crate::GeneratorBuilder
pub struct LockSnowflakeGenerator<T = SystemClock, R = ThreadRandom>
where
    T: TimeSource,
    R: RandomSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<GeneratorState>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<GeneratorState>>,
    config: GeneratorConfig,
    time: T,
    rng: R,
}

impl<T, R> LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandomSource,
{
    /// Creates a generator for an already validated layout.
    ///
    /// Most callers want [`GeneratorBuilder`], which also resolves the node id
    /// and node-bit width from the environment.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if `time` currently reports a time before
    ///   the layout's custom epoch
    /// - [`Error::ClockOutOfRange`] if the time since the custom epoch does not
    ///   fit in the 42-bit time field
    ///
    /// # Example
    /// ```
    /// use flakeid::{FixedClock, GeneratorConfig, LockSnowflakeGenerator, ThreadRandom};
    ///
    /// let config = GeneratorConfig::new(7, 10, 0).unwrap();
    /// let generator = LockSnowflakeGenerator::new(config, FixedClock::new(1_000), ThreadRandom).unwrap();
    ///
    /// let id = generator.create();
    /// assert_eq!(id.time_field(), 1_000);
    /// assert_eq!(id.node(10), 7);
    /// ```
    ///
    /// [`GeneratorBuilder`]: crate::GeneratorBuilder
    pub fn new(config: GeneratorConfig, time: T, rng: R) -> Result<Self> {
        check_clock(&config, &time)?;
        let state = GeneratorState::seeded(&config, &rng);
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
            config,
            time,
            rng,
        })
    }

    /// Returns the next id.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn create(&self) -> SnowflakeId {
        let mut state = lock(&self.state);
        let now = self.config.adjusted_time(self.time.current_millis());
        *state = state.advance(now, &self.config, &self.rng);
        self.config.pack(state.last_time, state.counter)
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

/// Rejects a clock whose time since the layout's epoch is negative or does
/// not fit the time field.
pub(crate) fn check_clock<T: TimeSource>(config: &GeneratorConfig, time: &T) -> Result<()> {
    let now = time.current_millis();
    let epoch = config.custom_epoch();
    if now < epoch {
        return Err(Error::ClockBeforeEpoch { now, epoch });
    }
    match now.checked_sub(epoch) {
        Some(adjusted) if adjusted as u64 <= SnowflakeId::MAX_TIME => Ok(()),
        _ => Err(Error::ClockOutOfRange { now, epoch }),
    }
}

impl<T, R> SnowflakeGenerator for LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandomSource,
{
    fn create(&self) -> SnowflakeId {
        self.create()
    }

    fn config(&self) -> &GeneratorConfig {
        self.config()
    }
}

impl<T, R> Clone for LockSnowflakeGenerator<T, R>
where
    T: TimeSource + Clone,
    R: RandomSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config,
            time: self.time.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<T, R> fmt::Debug for LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandomSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockSnowflakeGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
