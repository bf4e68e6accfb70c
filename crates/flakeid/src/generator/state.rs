use crate::{SnowflakeId, generator::GeneratorConfig, rand::RandomSource};

const MAX_TIME: i64 = SnowflakeId::MAX_TIME as i64;

/// Mutable generator state: the last emitted adjusted timestamp and the
/// counter that went with it.
///
/// Both generator flavours advance this through [`GeneratorState::advance`];
/// the atomic one round-trips it through a single `u64` with the same layout
/// as the id's time/tail split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GeneratorState {
    pub(crate) last_time: i64,
    pub(crate) counter: u32,
}

impl GeneratorState {
    /// Starting state: adjusted time zero and a random counter.
    pub(crate) fn seeded<R: RandomSource>(config: &GeneratorConfig, rng: &R) -> Self {
        Self {
            last_time: 0,
            counter: config.random_counter(rng),
        }
    }

    /// Produces the state for the next id given the current adjusted time.
    ///
    /// A clock that has not moved past `last_time` (same millisecond, or
    /// regressed) increments the counter; overflow carries into the
    /// timestamp, so the emitted time may run ahead of the wall clock. A clock
    /// that has moved forward adopts `now` and reseeds the counter. Virtual
    /// time stops at the last value the time field can hold.
    #[inline]
    pub(crate) fn advance<R: RandomSource>(
        self,
        now: i64,
        config: &GeneratorConfig,
        rng: &R,
    ) -> Self {
        if now <= self.last_time {
            // counter <= counter_mask < 2^22, so this cannot overflow
            let counter = self.counter + 1;
            let carry = counter >> config.counter_bits();
            if carry != 0 {
                Self::cold_virtual_advance(now, self.last_time);
            }
            Self {
                last_time: (self.last_time + i64::from(carry)).min(MAX_TIME),
                counter: counter & config.counter_mask(),
            }
        } else {
            Self {
                last_time: now,
                counter: config.random_counter(rng),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_virtual_advance(now: i64, last_time: i64) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            now,
            last_time,
            ahead_by = last_time + 1 - now,
            "counter exhausted, advancing timestamp past the clock"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = (now, last_time);
    }

    pub(crate) const fn to_bits(self) -> u64 {
        ((self.last_time as u64) << SnowflakeId::TIME_SHIFT) | self.counter as u64
    }

    pub(crate) const fn from_bits(bits: u64) -> Self {
        Self {
            last_time: (bits >> SnowflakeId::TIME_SHIFT) as i64,
            counter: (bits & SnowflakeId::TAIL_MASK) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::IntRandom;

    fn config() -> GeneratorConfig {
        GeneratorConfig::new(0, 20, 0).unwrap()
    }

    #[test]
    fn forward_clock_reseeds() {
        let rng = IntRandom::new(|| 0x7FFF_FFFF);
        let state = GeneratorState {
            last_time: 10,
            counter: 1,
        };
        let next = state.advance(11, &config(), &rng);
        assert_eq!(next, GeneratorState {
            last_time: 11,
            counter: 3
        });
    }

    #[test]
    fn same_or_older_clock_increments() {
        let rng = IntRandom::new(|| 0);
        let state = GeneratorState {
            last_time: 10,
            counter: 1,
        };
        assert_eq!(state.advance(10, &config(), &rng).counter, 2);
        assert_eq!(state.advance(3, &config(), &rng), GeneratorState {
            last_time: 10,
            counter: 2
        });
    }

    #[test]
    fn overflow_carries_into_time() {
        let rng = IntRandom::new(|| 0);
        let state = GeneratorState {
            last_time: 10,
            counter: 3,
        };
        assert_eq!(state.advance(10, &config(), &rng), GeneratorState {
            last_time: 11,
            counter: 0
        });
    }

    #[test]
    fn carry_stops_at_the_last_representable_time() {
        let rng = IntRandom::new(|| 0);
        let state = GeneratorState {
            last_time: MAX_TIME,
            counter: 3,
        };
        let next = state.advance(MAX_TIME, &config(), &rng);
        assert_eq!(next.last_time, MAX_TIME);
        assert_eq!(GeneratorState::from_bits(next.to_bits()), next);
    }

    #[test]
    fn bits_round_trip() {
        let state = GeneratorState {
            last_time: 123_456_789,
            counter: 0x3F_FFFF,
        };
        assert_eq!(GeneratorState::from_bits(state.to_bits()), state);
    }
}
