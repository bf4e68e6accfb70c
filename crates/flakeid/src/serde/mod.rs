//! Adapters for `#[serde(with = ...)]`.
//!
//! [`SnowflakeId`] itself serializes as its raw `u64`. Use [`as_base32`] to
//! carry the canonical 13-character string instead, or [`as_native`] to be
//! explicit about the integer form on a field.
//!
//! ```
//! use flakeid::SnowflakeId;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "flakeid::serde::as_base32")]
//!     id: SnowflakeId,
//! }
//!
//! let event = Event { id: SnowflakeId::from_raw(42) };
//! let json = serde_json::to_string(&event).unwrap();
//! assert_eq!(json, r#"{"id":"000000000001A"}"#);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SnowflakeId;

pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer, SnowflakeId};

    /// Serialize an id as its raw `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error> {
        id.to_raw().serialize(s)
    }

    /// Deserialize an id from a raw `u64`. Every value is a valid id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SnowflakeId, D::Error> {
        u64::deserialize(d).map(SnowflakeId::from_raw)
    }
}

pub mod as_base32 {
    use core::fmt;

    use serde::de::{self, Visitor};

    use super::{Deserializer, Serializer, SnowflakeId};

    /// Serialize an id as its canonical Crockford base32 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(id.encode().as_str())
    }

    /// Deserialize an id from a canonical Crockford base32 string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not 13 characters long
    /// - It contains a character outside the Crockford alphabet
    /// - The value does not fit in 64 bits
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SnowflakeId, D::Error> {
        d.deserialize_str(Base32Visitor)
    }

    struct Base32Visitor;

    impl Visitor<'_> for Base32Visitor {
        type Value = SnowflakeId;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a 13-character Crockford base32 string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            SnowflakeId::from_string(v).map_err(E::custom)
        }
    }
}
