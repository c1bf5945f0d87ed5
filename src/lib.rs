//! # jsonx
//!
//! A JSON codec with extended literals, arbitrary-precision integers,
//! date/time formatting and fallback resolvers.
//!
//! ## What makes it different?
//!
//! Plain JSON cannot say `NaN`, loses the difference between `7` and
//! `7.0`, silently rounds big integers, and has no story for host
//! objects like dates. This crate keeps all of that:
//!
//! - **Extended literals**: `NaN`, `Infinity`, `+Infinity` and
//!   `-Infinity` decode and encode as bare tokens
//! - **Number identity**: integers are arbitrary precision and stay
//!   integers; floats stay floats (`7.0` never collapses to `7`)
//! - **Date/time values**: dates, times and datetimes encode through
//!   configurable strftime formats
//! - **Fallback resolvers**: a per-call closure maps otherwise
//!   unencodable values to JSON, and may even mutate shared containers
//!   mid-encode
//! - **Cycle detection**: self-referential value graphs are reported as
//!   errors instead of overflowing the stack
//! - **Precise errors**: every decode error carries the byte offset
//!   where it was detected
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! jsonx = "0.1"
//! ```
//!
//! ### Decoding and Encoding
//!
//! ```rust
//! use jsonx::{decode, encode};
//!
//! let value = decode(r#"{"name": "Alice", "score": NaN, "visits": 3}"#).unwrap();
//!
//! let object = value.as_object().unwrap();
//! assert_eq!(object.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert!(object.get("score").and_then(|v| v.as_f64()).unwrap().is_nan());
//! drop(object);
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(text, r#"{"name": "Alice", "score": NaN, "visits": 3}"#);
//! ```
//!
//! ### Building Values with the jsonx! Macro
//!
//! ```rust
//! use jsonx::{encode, jsonx};
//!
//! let value = jsonx!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "json"]
//! });
//! assert_eq!(
//!     encode(&value).unwrap(),
//!     r#"{"name": "Alice", "age": 30, "tags": ["rust", "json"]}"#
//! );
//! ```
//!
//! ### Options
//!
//! ```rust
//! use jsonx::{encode_with_options, EncodeOptions, Value};
//! use chrono::NaiveDate;
//!
//! let date = Value::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! let options = EncodeOptions::new().with_date_format("%d.%m.%Y");
//! assert_eq!(encode_with_options(&date, options).unwrap(), "\"15.01.2024\"");
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Decoding**: O(n) single-pass over the input bytes, no backtracking
//! - **Encoding**: O(n) over the value graph, with an identity stack for
//!   cycle detection
//! - **Memory**: strings without escapes decode without a second pass;
//!   output buffers are pre-allocated
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All indexing is bounds-checked
//! - Proper error propagation with `Result` types
//! - No panics in the public API (except for logic errors that indicate bugs)

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Decoder;
pub use error::{DecodeError, EncodeError};
pub use map::Map;
pub use options::{
    DecodeOptions, EncodeOptions, Fallback, DEFAULT_DATE_FORMAT, DEFAULT_MAX_DEPTH,
    DEFAULT_TIME_FORMAT,
};
pub use ser::{to_value, Encoder, ValueSerializer};
pub use value::{Number, OpaqueValue, Value};

/// Decodes a JSON document into a [`Value`] with default options.
///
/// # Examples
///
/// ```rust
/// use jsonx::decode;
///
/// let value = decode("[1, 2.5, \"three\"]").unwrap();
/// assert_eq!(value.as_array().unwrap().len(), 3);
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first syntax problem, with
/// the byte offset where it was detected.
pub fn decode(input: &str) -> Result<Value, DecodeError> {
    decode_with_options(input, DecodeOptions::default())
}

/// Decodes a JSON document into a [`Value`] with the given options.
///
/// # Examples
///
/// ```rust
/// use jsonx::{decode_with_options, DecodeOptions};
///
/// let options = DecodeOptions::new().with_max_depth(4);
/// assert!(decode_with_options("[[[[[1]]]]]", options).is_err());
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first syntax problem.
pub fn decode_with_options(input: &str, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::with_options(input, options).finish()
}

/// Encodes a [`Value`] as JSON text with default options.
///
/// # Examples
///
/// ```rust
/// use jsonx::{encode, jsonx};
///
/// let value = jsonx!({"ok": true});
/// assert_eq!(encode(&value).unwrap(), r#"{"ok": true}"#);
/// ```
///
/// # Errors
///
/// Returns an [`EncodeError`] for cycles, excessive nesting and values
/// with no JSON representation.
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    encode_with_options(value, EncodeOptions::default())
}

/// Encodes a [`Value`] as JSON text with the given options.
///
/// # Examples
///
/// ```rust
/// use jsonx::{encode_with_options, EncodeOptions, Value};
///
/// let options = EncodeOptions::new().with_fallback(|_| Ok(Value::Null));
/// let text = encode_with_options(&Value::from(1), options).unwrap();
/// assert_eq!(text, "1");
/// ```
///
/// # Errors
///
/// Returns an [`EncodeError`] for cycles, excessive nesting, failed
/// resolvers and values with no JSON representation.
pub fn encode_with_options(value: &Value, options: EncodeOptions) -> Result<String, EncodeError> {
    let mut encoder = Encoder::new(options);
    encoder.encode_value(value)?;
    Ok(encoder.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_roundtrip() {
        let text = r#"{"id": 7, "name": "Alice", "rate": 2.5, "tags": ["a", "b"], "extra": null}"#;
        let value = decode(text).unwrap();
        assert_eq!(encode(&value).unwrap(), text);
    }

    #[test]
    fn test_extended_literals_roundtrip() {
        let value = decode("[NaN, Infinity, -Infinity]").unwrap();
        assert_eq!(encode(&value).unwrap(), "[NaN, Infinity, -Infinity]");
    }

    #[test]
    fn test_to_value_then_encode() {
        #[derive(serde::Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(encode(&value).unwrap(), r#"{"x": 1, "y": 2}"#);
    }

    #[test]
    fn test_float_identity_survives_roundtrip() {
        let value = decode("[7, 7.0]").unwrap();
        let items = value.as_array().unwrap();
        assert!(items[0].as_number().unwrap().is_int());
        assert!(items[1].as_number().unwrap().is_float());
        drop(items);
        assert_eq!(encode(&value).unwrap(), "[7, 7.0]");
    }
}
