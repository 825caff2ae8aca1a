//! Structural errors raised while encoding or decoding ledger objects.

use thiserror::Error;

/// A malformed, truncated or invariant-violating byte layout.
///
/// Every variant carries enough context (field name, observed vs. expected
/// size or order) to point at the offending bytes without a debugger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes remain than the field needs.
    #[error("{field} length {needed} exceeds the remaining data {available}")]
    Underflow {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// A type tag that does not name any known variant.
    #[error("unrecognized {entity} type {tag}")]
    UnrecognizedType { entity: &'static str, tag: u32 },

    /// A type tag that names a known variant, just not the one expected here.
    #[error("{entity} type {actual} does not match expected type {expected}")]
    TypeMismatch {
        entity: &'static str,
        expected: u32,
        actual: u32,
    },

    /// Bytes left over after a complete top-level object.
    #[error("{entity} has {remaining} bytes of trailing data")]
    TrailingData {
        entity: &'static str,
        remaining: usize,
    },

    #[error("{field} count {count} exceeds the maximum {max}")]
    TooMany {
        field: &'static str,
        count: usize,
        max: usize,
    },

    #[error("{field} count {count} is below the minimum {min}")]
    TooFew {
        field: &'static str,
        count: usize,
        min: usize,
    },

    /// A variable-length field outside its allowed range.
    #[error("{field} length {length} is outside the range {min}..={max}")]
    InvalidLength {
        field: &'static str,
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("{entity} parents must be unique")]
    ParentsNotUnique { entity: &'static str },

    #[error("{entity} parents must be sorted lexicographically")]
    ParentsNotSorted { entity: &'static str },

    /// A variant the transaction essence does not allow (treasury inputs,
    /// treasury outputs, or any payload but indexation).
    #[error("transaction essence cannot contain {member}")]
    IllegalEssenceMember { member: String },

    /// A payload variant that is not allowed in this position.
    #[error("{context} cannot contain a payload of type {payload_type}")]
    IllegalPayload {
        context: &'static str,
        payload_type: u32,
    },

    /// A payload frame that must be present was empty.
    #[error("{context} requires a payload")]
    MissingPayload { context: &'static str },

    /// A boolean byte other than 0 or 1.
    #[error("{field} value {value} is not a boolean")]
    InvalidBool { field: &'static str, value: u8 },

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// A length prefix that claims more bytes than the buffer holds.
    #[error("{field} length {length} exceeds the remaining data {remaining}")]
    LengthExceedsRemaining {
        field: &'static str,
        length: usize,
        remaining: usize,
    },

    #[error("message length {length} exceeds the maximum {max}")]
    MessageTooLarge { length: usize, max: usize },

    #[error("{field} is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    /// A cursor moved past the end of its buffer.
    #[error("cannot seek to {index}, the stream is only {length} bytes long")]
    SeekOutOfRange { index: usize, length: usize },
}
