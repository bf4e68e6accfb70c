use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr, time::Duration};

use crate::{
    Error, Result,
    generator::{
        AtomicSnowflakeGenerator, DEFAULT_NODE_BITS, GeneratorConfig, LockSnowflakeGenerator,
        MAX_NODE_BITS,
    },
    rand::{ByteRandom, IntRandom, RandomSource, ThreadRandom},
    time::{DEFAULT_EPOCH, FixedClock, SystemClock, TimeSource, epoch_millis},
};

/// Variables consulted for the node id, in priority order.
pub const NODE_ENV_VARS: [&str; 2] = ["SNOWFLAKEID_NODE", "snowflakeid.node"];

/// Variables consulted for the expected number of nodes, in priority order.
pub const NODE_COUNT_ENV_VARS: [&str; 2] = ["SNOWFLAKEID_NODE_COUNT", "snowflakeid.node.count"];

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Assembles a generator from explicit values, the process environment and
/// defaults.
///
/// | setting     | explicit              | environment                  | default            |
/// |-------------|-----------------------|------------------------------|--------------------|
/// | node bits   | [`with_node_bits`]    | `SNOWFLAKEID_NODE_COUNT`     | 10                 |
/// | node        | [`with_node`]         | `SNOWFLAKEID_NODE`           | random             |
/// | epoch       | [`with_epoch`]        |                              | [`DEFAULT_EPOCH`]  |
/// | randomness  | [`with_random`]       |                              | [`ThreadRandom`]   |
/// | clock       | [`with_clock`]        |                              | [`SystemClock`]    |
///
/// `SNOWFLAKEID_NODE_COUNT` is a node count, rounded up to the smallest
/// bit width that can address that many nodes. Environment and random node
/// ids are masked to the node-bit width; explicit ones must already fit.
/// Environment values that do not parse are skipped.
///
/// # Example
/// ```
/// use flakeid::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .with_node(42)
///     .with_node_bits(8)
///     .build()
///     .unwrap();
///
/// let id = generator.create();
/// assert_eq!(id.node(8), 42);
/// ```
///
/// [`with_node_bits`]: GeneratorBuilder::with_node_bits
/// [`with_node`]: GeneratorBuilder::with_node
/// [`with_epoch`]: GeneratorBuilder::with_epoch
/// [`with_random`]: GeneratorBuilder::with_random
/// [`with_clock`]: GeneratorBuilder::with_clock
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
pub struct GeneratorBuilder<T = SystemClock, R = ThreadRandom> {
    node: Option<u32>,
    node_bits: Option<u8>,
    epoch: i64,
    time: T,
    rng: R,
    env: Option<EnvLookup>,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            node: None,
            node_bits: None,
            epoch: epoch_millis(DEFAULT_EPOCH),
            time: SystemClock::new(),
            rng: ThreadRandom,
            env: Some(process_env),
        }
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> GeneratorBuilder<T, R>
where
    T: TimeSource,
    R: RandomSource,
{
    #[must_use]
    pub const fn with_node(mut self, node: u32) -> Self {
        self.node = Some(node);
        self
    }

    #[must_use]
    pub const fn with_node_bits(mut self, node_bits: u8) -> Self {
        self.node_bits = Some(node_bits);
        self
    }

    /// Sets the custom epoch as an offset from the Unix epoch.
    #[must_use]
    pub fn with_epoch(self, epoch: Duration) -> Self {
        self.with_epoch_millis(epoch_millis(epoch))
    }

    #[must_use]
    pub const fn with_epoch_millis(mut self, epoch: i64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Skips the process environment when resolving the node id and
    /// node-bit width.
    #[must_use]
    pub const fn ignore_environment(mut self) -> Self {
        self.env = None;
        self
    }

    #[cfg(test)]
    pub(crate) const fn with_env_lookup(mut self, env: EnvLookup) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_random<R2: RandomSource>(self, rng: R2) -> GeneratorBuilder<T, R2> {
        GeneratorBuilder {
            node: self.node,
            node_bits: self.node_bits,
            epoch: self.epoch,
            time: self.time,
            rng,
            env: self.env,
        }
    }

    /// Uses an integer-producing function for randomness.
    pub fn with_random_fn<F>(self, f: F) -> GeneratorBuilder<T, IntRandom<F>>
    where
        F: Fn() -> i32,
    {
        self.with_random(IntRandom::new(f))
    }

    /// Uses a byte-producing function for randomness.
    pub fn with_random_bytes_fn<F>(self, f: F) -> GeneratorBuilder<T, ByteRandom<F>>
    where
        F: Fn(usize) -> Vec<u8>,
    {
        self.with_random(ByteRandom::new(f))
    }

    pub fn with_clock<T2: TimeSource>(self, time: T2) -> GeneratorBuilder<T2, R> {
        GeneratorBuilder {
            node: self.node,
            node_bits: self.node_bits,
            epoch: self.epoch,
            time,
            rng: self.rng,
            env: self.env,
        }
    }

    /// Pins the clock to `millis` since the Unix epoch.
    pub fn with_fixed_time(self, millis: i64) -> GeneratorBuilder<FixedClock, R> {
        self.with_clock(FixedClock::new(millis))
    }

    /// Uses the system clock shifted by a fixed offset.
    pub fn with_utc_offset_millis(self, offset: i64) -> GeneratorBuilder<SystemClock, R> {
        self.with_clock(SystemClock::with_offset(offset))
    }

    /// Resolves and validates the layout without building a generator.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeBitsOutOfRange`] for an explicit width above
    ///   [`MAX_NODE_BITS`]
    /// - [`Error::NodeOutOfRange`] for an explicit node that does not fit
    /// - [`Error::Environment`] for a node count needing more than
    ///   [`MAX_NODE_BITS`] bits
    pub fn resolve(&self) -> Result<GeneratorConfig> {
        let node_bits = match self.node_bits {
            Some(bits) => bits,
            None => self.env_node_bits()?.unwrap_or(DEFAULT_NODE_BITS),
        };
        if node_bits > MAX_NODE_BITS {
            return Err(Error::NodeBitsOutOfRange { bits: node_bits });
        }
        let node_mask = (1_u32 << node_bits) - 1;
        let node = match self.node {
            Some(node) => node,
            None => match self.env_node() {
                Some(node) => node & node_mask,
                None => self.rng.next_int() as u32 & node_mask,
            },
        };

        let config = GeneratorConfig::new(node, node_bits, self.epoch)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            node = config.node(),
            node_bits = config.node_bits(),
            epoch = config.custom_epoch(),
            "resolved generator configuration"
        );
        Ok(config)
    }

    /// Builds a [`LockSnowflakeGenerator`].
    ///
    /// # Errors
    ///
    /// Any error from [`resolve`](Self::resolve), [`Error::ClockBeforeEpoch`]
    /// if the clock reads earlier than the epoch, or [`Error::ClockOutOfRange`]
    /// if the time since the epoch overflows the time field.
    pub fn build(self) -> Result<LockSnowflakeGenerator<T, R>> {
        let config = self.resolve()?;
        LockSnowflakeGenerator::new(config, self.time, self.rng)
    }

    /// Builds an [`AtomicSnowflakeGenerator`].
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_atomic(self) -> Result<AtomicSnowflakeGenerator<T, R>> {
        let config = self.resolve()?;
        AtomicSnowflakeGenerator::new(config, self.time, self.rng)
    }

    fn env_var(&self, names: &[&'static str]) -> Option<(&'static str, String)> {
        let env = self.env?;
        names
            .iter()
            .find_map(|&name| env(name).map(|value| (name, value)))
    }

    fn env_node(&self) -> Option<u32> {
        let (name, value) = self.env_var(&NODE_ENV_VARS)?;
        parse_env(name, &value)
    }

    fn env_node_bits(&self) -> Result<Option<u8>> {
        let Some((name, value)) = self.env_var(&NODE_COUNT_ENV_VARS) else {
            return Ok(None);
        };
        let Some(count) = parse_env::<u32>(name, &value) else {
            return Ok(None);
        };
        match node_bits_for_count(count) {
            Some(bits) => Ok(Some(bits)),
            None => Err(Error::Environment { name, value }),
        }
    }
}

fn parse_env<V: FromStr>(name: &str, value: &str) -> Option<V> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        #[cfg(feature = "tracing")]
        tracing::warn!(name, value, "ignoring unparsable environment variable");
        #[cfg(not(feature = "tracing"))]
        let _ = name;
    }
    parsed
}

/// Smallest node-bit width that addresses `count` nodes.
const fn node_bits_for_count(count: u32) -> Option<u8> {
    if count == 0 {
        return None;
    }
    let bits = (u32::BITS - (count - 1).leading_zeros()) as u8;
    if bits > MAX_NODE_BITS {
        return None;
    }
    Some(bits)
}

impl<T, R> fmt::Debug for GeneratorBuilder<T, R>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorBuilder")
            .field("node", &self.node)
            .field("node_bits", &self.node_bits)
            .field("epoch", &self.epoch)
            .field("time", &self.time)
            .field("env", &self.env.is_some())
            .finish_non_exhaustive()
    }
}
