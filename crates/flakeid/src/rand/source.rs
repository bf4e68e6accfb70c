use alloc::{vec, vec::Vec};
use core::fmt;

use rand::{Rng, RngCore, SeedableRng, rng, rngs::StdRng};

use super::{RandomSource, interface::fold_be};
use crate::mutex::{Mutex, lock};

/// A [`RandomSource`] backed by a function producing integers.
///
/// Wrap a pseudo-random generator, or a deterministic function when tests need
/// reproducible counters. Counters are taken from a single
/// [`RandomSource::next_int`] call.
///
/// # Example
/// ```
/// use flakeid::{IntRandom, RandomSource};
///
/// let rng = IntRandom::new(|| 0x0102_0304);
/// assert_eq!(rng.next_bytes(6), vec![1, 2, 3, 4, 1, 2]);
/// ```
#[derive(Clone)]
pub struct IntRandom<F> {
    f: F,
}

impl<F> IntRandom<F>
where
    F: Fn() -> i32,
{
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for IntRandom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntRandom").finish_non_exhaustive()
    }
}

impl<F> RandomSource for IntRandom<F>
where
    F: Fn() -> i32,
{
    fn next_int(&self) -> i32 {
        (self.f)()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0; len];
        let mut shift = 0_u32;
        let mut random = 0_u32;
        for byte in &mut bytes {
            if shift < 8 {
                shift = 32;
                random = (self.f)() as u32;
            }
            shift -= 8;
            *byte = (random >> shift) as u8;
        }
        bytes
    }

    fn next_counter(&self, _counter_bits: u32) -> u32 {
        self.next_int() as u32
    }
}

/// A [`RandomSource`] backed by a function filling byte blocks.
///
/// This is the natural adapter for cryptographic RNGs. Counters are folded
/// big-endian from exactly `ceil(counter_bits / 8)` requested bytes.
///
/// # Example
/// ```
/// use flakeid::{ByteRandom, RandomSource};
///
/// let rng = ByteRandom::new(|len| vec![0xFF; len]);
/// assert_eq!(rng.next_int(), -1);
/// assert_eq!(rng.next_counter(12), 0xFFFF);
/// ```
#[derive(Clone)]
pub struct ByteRandom<F> {
    f: F,
}

impl<F> ByteRandom<F>
where
    F: Fn(usize) -> Vec<u8>,
{
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for ByteRandom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRandom").finish_non_exhaustive()
    }
}

impl<F> RandomSource for ByteRandom<F>
where
    F: Fn(usize) -> Vec<u8>,
{
    fn next_int(&self) -> i32 {
        fold_be(&(self.f)(4)) as i32
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        (self.f)(len)
    }
}

/// A [`RandomSource`] that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and
/// automatically reseeded periodically. It is the default source for every
/// generator.
///
/// ⚠️ NOTE: The underlying `ThreadRng` is not `Send` or `Sync`. Since this type
/// does not store the RNG and only reaches the thread-local generator on each
/// call, it **is** thread-safe and may be freely shared across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_int(&self) -> i32 {
        rng().random()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0; len];
        rng().fill_bytes(&mut bytes);
        bytes
    }
}

/// A [`RandomSource`] over a [`StdRng`] seeded from a fixed value.
///
/// Two sources built from the same seed hand out the same sequence, which
/// makes generator runs reproducible. Not suitable when counters must be
/// unpredictable.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededRandom").finish_non_exhaustive()
    }
}

impl RandomSource for SeededRandom {
    fn next_int(&self) -> i32 {
        lock(&self.rng).random()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0; len];
        lock(&self.rng).fill_bytes(&mut bytes);
        bytes
    }
}
