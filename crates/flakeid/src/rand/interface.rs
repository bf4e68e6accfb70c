use alloc::{boxed::Box, rc::Rc, sync::Arc, vec::Vec};

/// A source of randomness used to seed the counter bits of an identifier.
///
/// Two shapes exist in practice: sources that naturally produce integers
/// ([`IntRandom`]) and sources that fill byte blocks ([`ByteRandom`], the
/// natural interface of cryptographic RNGs). Both can serve either request.
///
/// The generator asks for a counter via [`RandomSource::next_counter`], which
/// by default requests `ceil(counter_bits / 8)` bytes and folds them
/// big-endian. Integer-backed sources override it to hand out a single
/// integer instead. The caller masks the result.
///
/// # Example
/// ```
/// use flakeid::RandomSource;
///
/// struct FixedRand;
/// impl RandomSource for FixedRand {
///     fn next_int(&self) -> i32 {
///         1234
///     }
///
///     fn next_bytes(&self, len: usize) -> Vec<u8> {
///         vec![0xAB; len]
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.next_int(), 1234);
/// assert_eq!(rng.next_counter(12), 0xABAB);
/// ```
///
/// [`IntRandom`]: crate::IntRandom
/// [`ByteRandom`]: crate::ByteRandom
pub trait RandomSource {
    /// Returns a random 32-bit integer.
    fn next_int(&self) -> i32;

    /// Returns exactly `len` random bytes.
    fn next_bytes(&self, len: usize) -> Vec<u8>;

    /// Returns unmasked random bits for a counter of `counter_bits` width.
    fn next_counter(&self, counter_bits: u32) -> u32 {
        let len = counter_bits.div_ceil(8) as usize;
        fold_be(&self.next_bytes(len))
    }
}

/// Folds up to the last four bytes of `bytes` into an integer, most
/// significant byte first.
pub(crate) fn fold_be(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0_u32, |acc, &b| (acc << 8) | u32::from(b))
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn next_int(&self) -> i32 {
        (**self).next_int()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        (**self).next_bytes(len)
    }

    fn next_counter(&self, counter_bits: u32) -> u32 {
        (**self).next_counter(counter_bits)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_int(&self) -> i32 {
        (**self).next_int()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        (**self).next_bytes(len)
    }

    fn next_counter(&self, counter_bits: u32) -> u32 {
        (**self).next_counter(counter_bits)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Arc<R> {
    fn next_int(&self) -> i32 {
        (**self).next_int()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        (**self).next_bytes(len)
    }

    fn next_counter(&self, counter_bits: u32) -> u32 {
        (**self).next_counter(counter_bits)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Rc<R> {
    fn next_int(&self) -> i32 {
        (**self).next_int()
    }

    fn next_bytes(&self, len: usize) -> Vec<u8> {
        (**self).next_bytes(len)
    }

    fn next_counter(&self, counter_bits: u32) -> u32 {
        (**self).next_counter(counter_bits)
    }
}
