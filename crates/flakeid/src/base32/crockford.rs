use crate::{Error, Result};

/// Canonical uppercase alphabet (Crockford base32: no I, L, O, U).
pub const ALPHABET_UPPER: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Lowercase counterpart of [`ALPHABET_UPPER`].
pub const ALPHABET_LOWER: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Number of characters in the canonical text form of a 64-bit id.
pub const CANONICAL_LEN: usize = 13;

const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;
const MASK: u64 = 0x1F;

/// Lookup table for canonical decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = ALPHABET_UPPER[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i;
        }
        i += 1;
    }
    // Visually similar aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Which alphabet to render the canonical form in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Case {
    #[default]
    Upper,
    Lower,
}

impl Case {
    const fn alphabet(self) -> &'static [u8; 32] {
        match self {
            Self::Upper => ALPHABET_UPPER,
            Self::Lower => ALPHABET_LOWER,
        }
    }
}

/// Encodes `value` as 13 characters, five bits per character, most
/// significant group first. The leading group only carries the top four bits.
#[must_use]
pub const fn encode_canonical(value: u64, case: Case) -> [u8; CANONICAL_LEN] {
    let alphabet = case.alphabet();
    let mut buf = [0_u8; CANONICAL_LEN];
    let mut i = 0;
    while i < CANONICAL_LEN {
        let shift = (CANONICAL_LEN - 1 - i) as u32 * BITS_PER_CHAR;
        buf[i] = alphabet[((value >> shift) & MASK) as usize];
        i += 1;
    }
    buf
}

/// Decodes a 13-character canonical string.
///
/// Decoding is case-insensitive and accepts `O`, `I` and `L` as aliases for
/// `0`, `1` and `1`.
///
/// # Errors
///
/// - [`Error::InvalidLength`] if `encoded` is not exactly 13 bytes long
/// - [`Error::InvalidCharacter`] for any byte outside the alphabet
/// - [`Error::Overflow`] if the first character encodes a value of 16 or more,
///   which would need a 65th bit
pub fn decode_canonical(encoded: &str) -> Result<u64> {
    let bytes = encoded.as_bytes();
    if bytes.len() != CANONICAL_LEN {
        return Err(Error::InvalidLength {
            expected: CANONICAL_LEN,
            actual: bytes.len(),
        });
    }

    let mut acc = 0_u64;
    for (index, &byte) in bytes.iter().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Error::InvalidCharacter { byte, index });
        }
        acc = (acc << BITS_PER_CHAR) | u64::from(val);
    }

    // 13 symbols carry 65 bits; the top one must be clear
    if LOOKUP[bytes[0] as usize] & 0b1_0000 != 0 {
        return Err(Error::Overflow);
    }
    Ok(acc)
}

/// Returns `true` if `encoded` decodes to a 64-bit id.
#[must_use]
pub fn is_valid_canonical(encoded: &str) -> bool {
    let bytes = encoded.as_bytes();
    bytes.len() == CANONICAL_LEN
        && LOOKUP[bytes[0] as usize] & 0b1_0000 == 0
        && bytes.iter().all(|&b| LOOKUP[b as usize] != NO_VALUE)
}
