use crate::{Error, Result, SnowflakeId, rand::RandomSource};

/// Largest supported node-bit width.
pub const MAX_NODE_BITS: u8 = 20;

/// Node-bit width used when nothing else is configured (1024 nodes, 4096 ids
/// per millisecond per node).
pub const DEFAULT_NODE_BITS: u8 = 10;

/// The immutable layout a generator packs ids with.
///
/// Holds the node id and how the 22 tail bits are split between node and
/// counter, plus the custom epoch subtracted from every timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    node: u32,
    node_bits: u8,
    counter_bits: u32,
    node_mask: u32,
    counter_mask: u32,
    custom_epoch: i64,
}

impl GeneratorConfig {
    /// Validates and derives a layout.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeBitsOutOfRange`] if `node_bits` exceeds
    ///   [`MAX_NODE_BITS`]
    /// - [`Error::NodeOutOfRange`] if `node` does not fit in `node_bits`
    ///
    /// # Example
    /// ```
    /// use flakeid::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new(3, 8, 0).unwrap();
    /// assert_eq!(config.counter_bits(), 14);
    /// assert_eq!(config.counter_mask(), 0x3FFF);
    /// assert!(GeneratorConfig::new(256, 8, 0).is_err());
    /// ```
    pub const fn new(node: u32, node_bits: u8, custom_epoch: i64) -> Result<Self> {
        if node_bits > MAX_NODE_BITS {
            return Err(Error::NodeBitsOutOfRange { bits: node_bits });
        }
        let counter_bits = SnowflakeId::TAIL_BITS - node_bits as u32;
        let tail_mask = SnowflakeId::TAIL_MASK as u32;
        let counter_mask = tail_mask >> node_bits;
        let node_mask = tail_mask >> counter_bits;
        if node > node_mask {
            return Err(Error::NodeOutOfRange {
                node,
                max: node_mask,
            });
        }
        Ok(Self {
            node,
            node_bits,
            counter_bits,
            node_mask,
            counter_mask,
            custom_epoch,
        })
    }

    pub const fn node(&self) -> u32 {
        self.node
    }

    pub const fn node_bits(&self) -> u8 {
        self.node_bits
    }

    pub const fn counter_bits(&self) -> u32 {
        self.counter_bits
    }

    pub const fn node_mask(&self) -> u32 {
        self.node_mask
    }

    pub const fn counter_mask(&self) -> u32 {
        self.counter_mask
    }

    /// Custom epoch in milliseconds since the Unix epoch.
    pub const fn custom_epoch(&self) -> i64 {
        self.custom_epoch
    }

    /// Random bytes needed to fill the counter: `ceil(counter_bits / 8)`.
    pub const fn random_bytes(&self) -> usize {
        self.counter_bits.div_ceil(8) as usize
    }

    /// Most ids one generator can issue per wall-clock millisecond before it
    /// starts advancing virtual time.
    pub const fn ids_per_millisecond(&self) -> u32 {
        self.counter_mask + 1
    }

    /// Draws a fresh, masked counter from `rng`.
    pub(crate) fn random_counter<R: RandomSource + ?Sized>(&self, rng: &R) -> u32 {
        rng.next_counter(self.counter_bits) & self.counter_mask
    }

    /// Converts Unix milliseconds to time since the custom epoch, capped at
    /// the largest value the time field holds.
    #[inline]
    pub(crate) fn adjusted_time(&self, unix_millis: i64) -> i64 {
        unix_millis
            .saturating_sub(self.custom_epoch)
            .min(SnowflakeId::MAX_TIME as i64)
    }

    /// Packs an adjusted timestamp and counter with this layout's node.
    #[inline]
    pub(crate) const fn pack(&self, adjusted_time: i64, counter: u32) -> SnowflakeId {
        SnowflakeId::from_raw(
            ((adjusted_time as u64) << SnowflakeId::TIME_SHIFT)
                | ((self.node as u64) << self.counter_bits)
                | (counter & self.counter_mask) as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_follow_node_bits() {
        for bits in 0..=MAX_NODE_BITS {
            let config = GeneratorConfig::new(0, bits, 0).unwrap();
            assert_eq!(config.counter_bits(), 22 - u32::from(bits));
            assert_eq!(config.node_mask(), (1 << bits) - 1);
            assert_eq!(config.counter_mask(), (1 << (22 - u32::from(bits))) - 1);
            assert_eq!(config.node_mask() << config.counter_bits() | config.counter_mask(), 0x3F_FFFF);
        }
    }

    #[test]
    fn random_bytes_cover_counter_bits() {
        assert_eq!(GeneratorConfig::new(0, 0, 0).unwrap().random_bytes(), 3);
        assert_eq!(GeneratorConfig::new(0, 6, 0).unwrap().random_bytes(), 2);
        assert_eq!(GeneratorConfig::new(0, 10, 0).unwrap().random_bytes(), 2);
        assert_eq!(GeneratorConfig::new(0, 14, 0).unwrap().random_bytes(), 1);
        assert_eq!(GeneratorConfig::new(0, 20, 0).unwrap().random_bytes(), 1);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            GeneratorConfig::new(0, 21, 0),
            Err(Error::NodeBitsOutOfRange { bits: 21 })
        );
        assert_eq!(
            GeneratorConfig::new(1024, 10, 0),
            Err(Error::NodeOutOfRange { node: 1024, max: 1023 })
        );
        assert_eq!(
            GeneratorConfig::new(1, 0, 0),
            Err(Error::NodeOutOfRange { node: 1, max: 0 })
        );
        assert!(GeneratorConfig::new(1023, 10, 0).is_ok());
    }

    #[test]
    fn adjusted_time_is_capped_to_the_time_field() {
        let config = GeneratorConfig::new(0, 10, 1_000).unwrap();
        assert_eq!(config.adjusted_time(1_500), 500);
        assert_eq!(config.adjusted_time(400), -600);
        assert_eq!(config.adjusted_time(i64::MAX), SnowflakeId::MAX_TIME as i64);
        let unix = GeneratorConfig::new(0, 10, 0).unwrap();
        assert_eq!(unix.adjusted_time(1 << 42), (1 << 42) - 1);
    }

    #[test]
    fn pack_places_fields() {
        let config = GeneratorConfig::new(5, 10, 0).unwrap();
        let id = config.pack(1_000, 77);
        assert_eq!(id.time_field(), 1_000);
        assert_eq!(id.node(10), 5);
        assert_eq!(id.counter(10), 77);
        assert_eq!(id, SnowflakeId::from_components(1_000, 5, 77, 10));
    }
}
