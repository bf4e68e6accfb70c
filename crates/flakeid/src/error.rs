/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakeid` can emit.
///
/// Identifier generation itself is infallible; every variant here is raised
/// either while building a generator (the configuration family, see
/// [`Error::is_configuration`]) or while decoding external input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The node-bit width is outside `0..=20`.
    #[error("node bits out of range [0, {max}]: {bits}", max = crate::MAX_NODE_BITS)]
    NodeBitsOutOfRange {
        /// The rejected width.
        bits: u8,
    },

    /// An explicitly supplied node id does not fit the configured node-bit
    /// width.
    #[error("node id out of range [0, {max}]: {node}")]
    NodeOutOfRange {
        /// The rejected node id.
        node: u32,
        /// The largest node id the width allows.
        max: u32,
    },

    /// The time source reported a time earlier than the custom epoch when the
    /// generator was built.
    #[error("clock ({now} ms) is earlier than the custom epoch ({epoch} ms)")]
    ClockBeforeEpoch {
        /// Milliseconds since the Unix epoch reported by the time source.
        now: i64,
        /// The configured custom epoch in milliseconds since the Unix epoch.
        epoch: i64,
    },

    /// The time source reported a time too far past the custom epoch for the
    /// 42-bit time field.
    #[error("clock ({now} ms) is beyond the time field's range for custom epoch ({epoch} ms)")]
    ClockOutOfRange {
        /// Milliseconds since the Unix epoch reported by the time source.
        now: i64,
        /// The configured custom epoch in milliseconds since the Unix epoch.
        epoch: i64,
    },

    /// An environment variable holds a value that cannot be used.
    #[error("invalid value for environment variable `{name}`: {value:?}")]
    Environment {
        /// Variable name as it was looked up.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// Decode input does not have the required fixed width.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length in bytes or characters.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },

    /// Decode input contains a symbol outside the active alphabet.
    #[error("invalid character {byte:#04x} at index {index}")]
    InvalidCharacter {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the input.
        index: usize,
    },

    /// Decoded value does not fit in 64 bits.
    #[error("decoded value overflows 64 bits")]
    Overflow,

    /// The requested radix is not in `2..=62`.
    #[error("invalid base: {base} (expected 2..=62)")]
    InvalidBase {
        /// The rejected radix.
        base: u32,
    },

    /// A format template is missing its placeholder or uses an unknown one.
    #[error("invalid format template: {template:?}")]
    InvalidTemplate {
        /// The rejected template.
        template: String,
    },

    /// Formatted input does not start and end with the template's literal
    /// text.
    #[error("input {input:?} does not match the format template")]
    TemplateMismatch {
        /// The rejected input.
        input: String,
    },
}

impl Error {
    /// Returns `true` for errors raised while configuring a generator.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NodeBitsOutOfRange { .. }
                | Self::NodeOutOfRange { .. }
                | Self::ClockBeforeEpoch { .. }
                | Self::ClockOutOfRange { .. }
                | Self::Environment { .. }
        )
    }
}
