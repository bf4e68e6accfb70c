//! Fixed-width text in any base from 2 to 62.
//!
//! Digits are taken from `0-9A-Za-z`, so base 16 is uppercase hex and base 36
//! stops at `Z`. Every base has a fixed width: the fewest digits that can hold
//! `2^64 - 1`, i.e. `ceil(64 / log2(base))`. Shorter values are left-padded
//! with `'0'`.

use alloc::string::String;

use crate::{Error, Result};

/// Digits for every supported base.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Smallest supported radix.
pub const MIN_BASE: u32 = 2;

/// Largest supported radix.
pub const MAX_BASE: u32 = 62;

const NO_VALUE: u8 = 255;

const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

fn check_base(base: u32) -> Result<()> {
    if base < MIN_BASE || base > MAX_BASE {
        return Err(Error::InvalidBase { base });
    }
    Ok(())
}

/// Number of digits a 64-bit value occupies in `base`.
///
/// Computed exactly as the least `n` with `base^n >= 2^64`, which equals
/// `ceil(64 / log2(base))` without floating point rounding.
///
/// # Errors
///
/// Returns [`Error::InvalidBase`] if `base` is outside `2..=62`.
pub fn width(base: u32) -> Result<usize> {
    check_base(base)?;
    let limit = 1_u128 << 64;
    let mut n = 0;
    let mut power = 1_u128;
    while power < limit {
        power *= u128::from(base);
        n += 1;
    }
    Ok(n)
}

/// Encodes `value` in `base`, left-padded to [`width`].
///
/// # Errors
///
/// Returns [`Error::InvalidBase`] if `base` is outside `2..=62`.
///
/// # Example
/// ```
/// use flakeid::basen;
///
/// assert_eq!(basen::encode(255, 16).unwrap(), "00000000000000FF");
/// assert_eq!(basen::encode(u64::MAX, 10).unwrap(), "18446744073709551615");
/// ```
pub fn encode(value: u64, base: u32) -> Result<String> {
    let len = width(base)?;
    let radix = u64::from(base);
    let mut buf = alloc::vec![ALPHABET[0]; len];
    let mut x = value;
    let mut i = len;
    while x > 0 {
        i -= 1;
        buf[i] = ALPHABET[(x % radix) as usize];
        x /= radix;
    }
    // SAFETY: every byte comes from the ASCII alphabet
    Ok(unsafe { String::from_utf8_unchecked(buf) })
}

/// Decodes a fixed-width `base` string into a 64-bit value.
///
/// # Errors
///
/// - [`Error::InvalidBase`] if `base` is outside `2..=62`
/// - [`Error::InvalidLength`] if `encoded` is not exactly [`width`] long
/// - [`Error::InvalidCharacter`] for a symbol outside the alphabet or not
///   smaller than `base`
/// - [`Error::Overflow`] if the value exceeds `2^64 - 1`
pub fn decode(encoded: &str, base: u32) -> Result<u64> {
    let len = width(base)?;
    let bytes = encoded.as_bytes();
    if bytes.len() != len {
        return Err(Error::InvalidLength {
            expected: len,
            actual: bytes.len(),
        });
    }

    let radix = u128::from(base);
    let mut acc = 0_u128;
    let mut overflow = false;
    for (index, &byte) in bytes.iter().enumerate() {
        let digit = LOOKUP[byte as usize];
        if digit == NO_VALUE || u32::from(digit) >= base {
            return Err(Error::InvalidCharacter { byte, index });
        }
        // Keep scanning for invalid characters once the value has overflowed,
        // but stop accumulating so the u128 cannot wrap.
        if !overflow {
            acc = acc * radix + u128::from(digit);
            overflow = acc > u128::from(u64::MAX);
        }
    }

    if overflow {
        return Err(Error::Overflow);
    }
    Ok(acc as u64)
}
