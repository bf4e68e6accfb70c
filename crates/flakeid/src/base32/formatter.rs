use alloc::string::String;
use core::fmt;

use super::{CANONICAL_LEN, Case, encode_canonical};

/// A stack-allocated canonical rendering of an id.
///
/// The formatter is a zero-allocation view that implements
/// [`core::fmt::Display`] and [`AsRef<str>`].
///
/// # Example
/// ```
/// use flakeid::SnowflakeId;
///
/// let id = SnowflakeId::from_raw(2_424_242_424_242_424_242);
/// assert_eq!(id.encode(), "23953MG16DJDJ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Base32Formatter {
    buf: [u8; CANONICAL_LEN],
}

impl Base32Formatter {
    #[must_use]
    pub const fn new(value: u64, case: Case) -> Self {
        Self {
            buf: encode_canonical(value, case),
        }
    }

    /// Returns a `&str` view of the encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `self.buf` holds only characters from the ASCII alphabets
        unsafe { core::str::from_utf8_unchecked(&self.buf) }
    }

    /// Consumes the formatter and returns the raw buffer.
    #[must_use]
    pub const fn into_inner(self) -> [u8; CANONICAL_LEN] {
        self.buf
    }
}

impl fmt::Display for Base32Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Base32Formatter {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<&str> for Base32Formatter {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<str> for Base32Formatter {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl From<Base32Formatter> for String {
    fn from(formatter: Base32Formatter) -> Self {
        Self::from(formatter.as_str())
    }
}
