use alloc::string::String;
use core::{fmt, str::FromStr, time::Duration};

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

use crate::{
    Error, Result,
    base32::{self, Base32Formatter, Case},
    basen,
    time::{DEFAULT_EPOCH, epoch_millis},
};

/// A 64-bit time-sortable identifier.
///
/// - 42 bits timestamp (ms since a custom epoch, [`DEFAULT_EPOCH`] unless the
///   generator was configured otherwise)
/// - 22 bits tail, split at generation time into a node id (high bits) and a
///   counter (low bits)
///
/// ```text
///  Bit Index:  63             22 21          22-N 21-N           0
///              +----------------+---------------+----------------+
///  Field:      | timestamp (42) | node (N bits) | counter (22-N) |
///              +----------------+---------------+----------------+
///              |<--------- MSB ------- 64 bits ------- LSB ----->|
/// ```
///
/// The node/counter split is not recorded in the value; use
/// [`SnowflakeId::node`] and [`SnowflakeId::counter`] with the node-bit width
/// the generator was built with.
///
/// Ids compare as unsigned 64-bit integers, so ordering follows the timestamp
/// first.
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Number of bits in the tail (node + counter).
    pub const TAIL_BITS: u32 = 22;

    /// Bitmask for extracting the 22-bit tail. Occupies bits 0 through 21.
    pub const TAIL_MASK: u64 = (1 << Self::TAIL_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit
    /// 22).
    pub const TIME_SHIFT: u32 = Self::TAIL_BITS;

    /// Number of bits in the timestamp field.
    pub const TIME_BITS: u32 = 64 - Self::TAIL_BITS;

    /// Largest adjusted timestamp the time field can hold.
    pub const MAX_TIME: u64 = (1 << Self::TIME_BITS) - 1;

    /// Size of the binary form.
    pub const BYTES: usize = 8;

    /// Length of the canonical text form.
    pub const CHARS: usize = base32::CANONICAL_LEN;

    /// The smallest id.
    pub const MIN: Self = Self::from_raw(0);

    /// The largest id.
    pub const MAX: Self = Self::from_raw(u64::MAX);

    /// Wraps a raw 64-bit value.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Returns the raw 64-bit value.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Reinterprets a signed 64-bit value bit-for-bit.
    ///
    /// # Example
    /// ```
    /// use flakeid::SnowflakeId;
    ///
    /// let id = SnowflakeId::from_long(-1);
    /// assert_eq!(id.to_raw(), u64::MAX);
    /// assert_eq!(id.to_long(), -1);
    /// ```
    #[must_use]
    pub const fn from_long(value: i64) -> Self {
        Self { id: value as u64 }
    }

    /// Returns the value reinterpreted as a signed 64-bit integer.
    #[must_use]
    pub const fn to_long(&self) -> i64 {
        self.id as i64
    }

    /// Packs an id from its fields. Each field is masked to its width.
    ///
    /// `node_bits` above 22 is clamped to 22.
    #[must_use]
    pub const fn from_components(time: u64, node: u32, counter: u32, node_bits: u8) -> Self {
        let node_bits = if node_bits as u32 > Self::TAIL_BITS {
            Self::TAIL_BITS
        } else {
            node_bits as u32
        };
        let counter_bits = Self::TAIL_BITS - node_bits;
        let counter_mask = Self::TAIL_MASK >> node_bits;
        let node_mask = Self::TAIL_MASK >> counter_bits;
        let tail = ((node as u64 & node_mask) << counter_bits) | (counter as u64 & counter_mask);
        Self {
            id: (time << Self::TIME_SHIFT) | tail,
        }
    }

    /// Returns the big-endian binary form.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.id.to_be_bytes()
    }

    /// Reads an id from exactly eight big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `bytes` is not eight bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::BYTES] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: Self::BYTES,
            actual: bytes.len(),
        })?;
        Ok(Self::from(bytes))
    }

    /// Milliseconds since the custom epoch (bits 63–22).
    #[must_use]
    pub const fn time_field(&self) -> u64 {
        self.id >> Self::TIME_SHIFT
    }

    /// The node and counter bits together (bits 21–0).
    #[must_use]
    pub const fn tail_field(&self) -> u64 {
        self.id & Self::TAIL_MASK
    }

    /// The node id, given the node-bit width used at creation.
    #[must_use]
    pub const fn node(&self, node_bits: u8) -> u32 {
        let node_bits = if node_bits as u32 > Self::TAIL_BITS {
            Self::TAIL_BITS
        } else {
            node_bits as u32
        };
        (self.tail_field() >> (Self::TAIL_BITS - node_bits)) as u32
    }

    /// The counter, given the node-bit width used at creation.
    #[must_use]
    pub const fn counter(&self, node_bits: u8) -> u32 {
        let node_bits = if node_bits as u32 > Self::TAIL_BITS {
            Self::TAIL_BITS
        } else {
            node_bits as u32
        };
        (self.tail_field() & (Self::TAIL_MASK >> node_bits)) as u32
    }

    /// Creation time in milliseconds since the Unix epoch, given the custom
    /// epoch in milliseconds.
    #[must_use]
    pub const fn unix_millis(&self, epoch: i64) -> i64 {
        (self.time_field() as i64).wrapping_add(epoch)
    }

    /// Creation time in milliseconds since the Unix epoch for ids built
    /// against [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH).
    #[must_use]
    pub fn unix_millis_default(&self) -> i64 {
        self.unix_millis(epoch_millis(DEFAULT_EPOCH))
    }

    /// Creation time as a [`SystemTime`], given the custom epoch.
    #[must_use]
    pub fn system_time(&self, epoch: Duration) -> SystemTime {
        UNIX_EPOCH + epoch + Duration::from_millis(self.time_field())
    }

    /// Returns a zero-allocation canonical (uppercase) rendering.
    #[must_use]
    pub const fn encode(&self) -> Base32Formatter {
        Base32Formatter::new(self.id, Case::Upper)
    }

    /// Returns the canonical form in lowercase.
    #[must_use]
    pub fn to_lower(&self) -> String {
        Base32Formatter::new(self.id, Case::Lower).into()
    }

    /// Parses the 13-character canonical form (case-insensitive, with `O`,
    /// `I`, `L` accepted as `0`, `1`, `1`).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] if `s` is not 13 characters
    /// - [`Error::InvalidCharacter`] for a symbol outside the alphabet
    /// - [`Error::Overflow`] if the first character's value is 16 or more
    ///
    /// # Example
    /// ```
    /// use flakeid::SnowflakeId;
    ///
    /// let id = SnowflakeId::from_long(-1);
    /// assert_eq!(id.to_string(), "FZZZZZZZZZZZZ");
    /// assert_eq!(SnowflakeId::from_string("fzzzzzzzzzzzz").unwrap(), id);
    /// ```
    pub fn from_string(s: &str) -> Result<Self> {
        base32::decode_canonical(s).map(Self::from_raw)
    }

    /// Returns `true` if `s` is a well-formed canonical string.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        base32::is_valid_canonical(s)
    }

    /// Encodes the id in `base` (2–62) at that base's fixed width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase`] if `base` is outside `2..=62`.
    pub fn encode_base(&self, base: u32) -> Result<String> {
        basen::encode(self.id, base)
    }

    /// Decodes an id from its fixed-width `base` representation.
    ///
    /// # Errors
    ///
    /// See [`basen::decode`](crate::basen::decode).
    pub fn decode_base(s: &str, base: u32) -> Result<Self> {
        basen::decode(s, base).map(Self::from_raw)
    }
}

impl From<[u8; SnowflakeId::BYTES]> for SnowflakeId {
    fn from(bytes: [u8; SnowflakeId::BYTES]) -> Self {
        Self::from_raw(u64::from_be_bytes(bytes))
    }
}

impl From<SnowflakeId> for [u8; SnowflakeId::BYTES] {
    fn from(id: SnowflakeId) -> Self {
        id.to_bytes()
    }
}

impl From<u64> for SnowflakeId {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<i64> for SnowflakeId {
    fn from(value: i64) -> Self {
        Self::from_long(value)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_long()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{} ({})", self.encode(), self.id))
            .field("time", &self.time_field())
            .field("tail", &self.tail_field())
            .finish()
    }
}
