//! Error types for JSON decoding and encoding.
//!
//! Decoding and encoding fail in structurally different ways, so each
//! direction gets its own closed enum. Decode errors carry the byte
//! offset into the input where the problem was detected; encode errors
//! describe the offending value instead.
//!
//! ## Examples
//!
//! ```rust
//! use jsonx::{decode, DecodeError};
//!
//! let err = decode("[1, 2").unwrap_err();
//! assert_eq!(err, DecodeError::UnterminatedArray { offset: 0 });
//! assert_eq!(err.kind(), "unterminated_array");
//! ```

use thiserror::Error;

/// All the ways decoding JSON text can fail.
///
/// Offsets are byte positions into the input string. For container and
/// string errors the offset points at the opening delimiter; for token
/// errors it points at the first byte of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input was empty or contained only whitespace.
    #[error("empty JSON description")]
    EmptyInput,

    /// A byte that cannot start any JSON token.
    #[error("cannot parse JSON description at position {offset}")]
    UnknownToken { offset: usize },

    /// A token started like a literal but did not match it exactly.
    #[error("malformed literal starting at position {offset}")]
    MalformedLiteral { offset: usize },

    /// The input ended before the closing quote of a string.
    #[error("unterminated string starting at position {offset}")]
    UnterminatedString { offset: usize },

    /// A backslash escape inside a string could not be decoded.
    #[error("invalid escape in string starting at position {offset}: {reason}")]
    InvalidStringEscape { offset: usize, reason: String },

    /// A number token violated the number grammar.
    #[error("invalid number starting at position {offset}")]
    InvalidNumber { offset: usize },

    /// The input ended inside an array.
    #[error("unterminated array starting at position {offset}")]
    UnterminatedArray { offset: usize },

    /// An array item was required but something else was found.
    #[error("expecting array item at position {offset}")]
    ExpectedArrayItem { offset: usize },

    /// A `,` or closing bracket was required after a container entry.
    #[error("expecting ',' or closing bracket at position {offset}")]
    ExpectedCommaOrCloseBracket { offset: usize },

    /// The input ended inside an object.
    #[error("unterminated object starting at position {offset}")]
    UnterminatedObject { offset: usize },

    /// An object key was required but something other than a string was found.
    #[error("expecting object property name at position {offset}")]
    ExpectedPropertyName { offset: usize },

    /// The `:` between a key and its value was missing.
    #[error("missing colon after object property name at position {offset}")]
    ExpectedColon { offset: usize },

    /// An object value was required but a `,` or closing brace was found.
    #[error("expecting object property value at position {offset}")]
    ExpectedPropertyValue { offset: usize },

    /// Containers were nested deeper than the configured limit.
    #[error("maximum nesting depth exceeded at position {offset}")]
    NestingTooDeep { offset: usize },

    /// Non-whitespace bytes remained after the top-level value.
    #[error("extra data after JSON description at position {offset}")]
    TrailingData { offset: usize },
}

impl DecodeError {
    /// Stable machine-readable identifier for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UnknownToken { .. } => "unknown_token",
            Self::MalformedLiteral { .. } => "malformed_literal",
            Self::UnterminatedString { .. } => "unterminated_string",
            Self::InvalidStringEscape { .. } => "invalid_string_escape",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::UnterminatedArray { .. } => "unterminated_array",
            Self::ExpectedArrayItem { .. } => "expected_array_item",
            Self::ExpectedCommaOrCloseBracket { .. } => "expected_comma_or_close_bracket",
            Self::UnterminatedObject { .. } => "unterminated_object",
            Self::ExpectedPropertyName { .. } => "expected_property_name",
            Self::ExpectedColon { .. } => "expected_colon",
            Self::ExpectedPropertyValue { .. } => "expected_property_value",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
            Self::TrailingData { .. } => "trailing_data",
        }
    }

    /// Byte offset into the input, if this kind carries one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::EmptyInput => None,
            Self::UnknownToken { offset }
            | Self::MalformedLiteral { offset }
            | Self::UnterminatedString { offset }
            | Self::InvalidStringEscape { offset, .. }
            | Self::InvalidNumber { offset }
            | Self::UnterminatedArray { offset }
            | Self::ExpectedArrayItem { offset }
            | Self::ExpectedCommaOrCloseBracket { offset }
            | Self::UnterminatedObject { offset }
            | Self::ExpectedPropertyName { offset }
            | Self::ExpectedColon { offset }
            | Self::ExpectedPropertyValue { offset }
            | Self::NestingTooDeep { offset }
            | Self::TrailingData { offset } => Some(*offset),
        }
    }
}

/// All the ways encoding a [`Value`](crate::Value) can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The value (or an opaque payload) has no JSON representation.
    #[error("object of type {0} is not JSON encodable")]
    UnsupportedType(String),

    /// A map key was not a string.
    #[error("JSON encodable objects must have string keys")]
    InvalidKeyType,

    /// A container directly or indirectly contains itself.
    #[error("a container with references to itself is not JSON encodable")]
    SelfReferential,

    /// The fallback resolver reported a failure.
    #[error("fallback resolver failed: {0}")]
    CallbackFailed(String),

    /// Values were nested deeper than the configured limit.
    #[error("maximum nesting depth exceeded")]
    NestingTooDeep,

    /// Free-form message from a serde serializer (see [`to_value`](crate::to_value)).
    #[error("{0}")]
    Message(String),
}

impl EncodeError {
    /// Stable machine-readable identifier for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedType(_) => "unsupported_type",
            Self::InvalidKeyType => "invalid_key_type",
            Self::SelfReferential => "self_referential",
            Self::CallbackFailed(_) => "callback_failed",
            Self::NestingTooDeep => "nesting_too_deep",
            Self::Message(_) => "message",
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}
