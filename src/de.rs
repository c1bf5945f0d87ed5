//! JSON decoding.
//!
//! This module provides the [`Decoder`], a recursive-descent parser that
//! turns JSON text into a [`Value`] tree.
//!
//! ## Overview
//!
//! - **Single forward pass**: one byte cursor, no backtracking, no
//!   separate lexer; the first significant byte of the input picks the
//!   production
//! - **Extended literals**: the bare tokens `NaN`, `Infinity`,
//!   `+Infinity` and `-Infinity` decode to the matching doubles
//! - **Lexical number identity**: a token with a `.` or an exponent
//!   becomes a float, anything else an arbitrary-precision integer
//! - **Byte offsets**: every error reports where in the input it was
//!   detected
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use jsonx::decode;
//!
//! let value = decode(r#"{"pi": 3.14, "big": 9999999999999999999999}"#).unwrap();
//! assert_eq!(value.as_object().unwrap().get("pi").and_then(|v| v.as_f64()), Some(3.14));
//! ```

use crate::options::DecodeOptions;
use crate::{DecodeError, Map, Number, Value};
use num_bigint::BigInt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq)]
enum ArrayState {
    ItemOrClose,
    CommaOrClose,
    Item,
    Done,
}

#[derive(Clone, Copy, PartialEq)]
enum ObjectState {
    KeyOrClose,
    CommaOrClose,
    Key,
    Done,
}

/// The JSON decoder.
///
/// Parses a complete JSON document into a [`Value`]. Created via
/// [`Decoder::from_str`] or [`Decoder::with_options`]; most callers go
/// through [`decode`](crate::decode) instead.
pub struct Decoder<'de> {
    input: &'de str,
    position: usize,
    depth: usize,
    options: DecodeOptions,
}

impl<'de> Decoder<'de> {
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(input: &'de str) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    #[must_use]
    pub fn with_options(input: &'de str, options: DecodeOptions) -> Self {
        Decoder {
            input,
            position: 0,
            depth: 0,
            options,
        }
    }

    /// Decodes the whole input as a single document.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] on any syntax problem, including
    /// non-whitespace bytes after the top-level value.
    pub fn finish(mut self) -> Result<Value, DecodeError> {
        let value = self.decode_value()?;
        self.skip_whitespace();
        if self.position < self.input.len() {
            return Err(DecodeError::TrailingData {
                offset: self.position,
            });
        }
        Ok(value)
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        // C isspace: space, \t, \n, \v, \f, \r
        while let Some(c) = self.peek() {
            if matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c) {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn decode_value(&mut self) -> Result<Value, DecodeError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(DecodeError::EmptyInput),
            Some(b'{') => self.descend(Self::decode_object),
            Some(b'[') => self.descend(Self::decode_array),
            Some(b'"') => self.decode_string().map(Value::Text),
            Some(b't') | Some(b'f') => self.decode_bool(),
            Some(b'n') => self.decode_null(),
            Some(b'N') => self.decode_nan(),
            Some(b'I') => self.decode_infinity(),
            Some(b'+') | Some(b'-') => {
                if self.input.as_bytes().get(self.position + 1) == Some(&b'I') {
                    self.decode_infinity()
                } else {
                    self.decode_number()
                }
            }
            Some(c) if c.is_ascii_digit() => self.decode_number(),
            Some(_) => Err(DecodeError::UnknownToken {
                offset: self.position,
            }),
        }
    }

    fn descend(
        &mut self,
        production: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep {
                offset: self.position,
            });
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn take_literal(&mut self, literal: &str, value: Value) -> Result<Value, DecodeError> {
        if self.input[self.position..].starts_with(literal) {
            self.position += literal.len();
            Ok(value)
        } else {
            Err(DecodeError::MalformedLiteral {
                offset: self.position,
            })
        }
    }

    fn decode_null(&mut self) -> Result<Value, DecodeError> {
        self.take_literal("null", Value::Null)
    }

    fn decode_bool(&mut self) -> Result<Value, DecodeError> {
        if self.peek() == Some(b't') {
            self.take_literal("true", Value::Bool(true))
        } else {
            self.take_literal("false", Value::Bool(false))
        }
    }

    fn decode_nan(&mut self) -> Result<Value, DecodeError> {
        self.take_literal("NaN", Value::from(f64::NAN))
    }

    fn decode_infinity(&mut self) -> Result<Value, DecodeError> {
        match self.peek() {
            Some(b'-') => self.take_literal("-Infinity", Value::from(f64::NEG_INFINITY)),
            Some(b'+') => self.take_literal("+Infinity", Value::from(f64::INFINITY)),
            _ => self.take_literal("Infinity", Value::from(f64::INFINITY)),
        }
    }

    /// Decodes a quoted string, cursor on the opening quote.
    ///
    /// First pass finds the closing quote while tracking whether any
    /// backslash occurred; backslash-free strings are taken verbatim,
    /// everything else goes through the escape-decoding pass.
    fn decode_string(&mut self) -> Result<String, DecodeError> {
        let start = self.position;
        let bytes = self.input.as_bytes();
        let mut i = start + 1;
        let mut saw_escape = false;
        loop {
            match bytes.get(i) {
                None => return Err(DecodeError::UnterminatedString { offset: start }),
                Some(b'\\') => {
                    saw_escape = true;
                    i += 2;
                }
                Some(b'"') => break,
                Some(_) => i += 1,
            }
        }
        let span = &self.input[start + 1..i];
        self.position = i + 1;
        if saw_escape || self.options.force_unicode {
            unescape(span, start)
        } else {
            Ok(span.to_string())
        }
    }

    fn decode_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        let bytes = self.input.as_bytes();
        let mut p = start;
        let mut is_float = false;

        if matches!(bytes.get(p), Some(b'+') | Some(b'-')) {
            p += 1;
        }
        match bytes.get(p) {
            Some(b'0') => {
                p += 1;
                // a leading zero must stand alone
                if bytes.get(p).map_or(false, u8::is_ascii_digit) {
                    return Err(DecodeError::InvalidNumber { offset: start });
                }
            }
            Some(c) if c.is_ascii_digit() => {
                while bytes.get(p).map_or(false, u8::is_ascii_digit) {
                    p += 1;
                }
            }
            _ => return Err(DecodeError::InvalidNumber { offset: start }),
        }
        if bytes.get(p) == Some(&b'.') {
            is_float = true;
            p += 1;
            if !bytes.get(p).map_or(false, u8::is_ascii_digit) {
                return Err(DecodeError::InvalidNumber { offset: start });
            }
            while bytes.get(p).map_or(false, u8::is_ascii_digit) {
                p += 1;
            }
        }
        if matches!(bytes.get(p), Some(b'e') | Some(b'E')) {
            is_float = true;
            p += 1;
            if matches!(bytes.get(p), Some(b'+') | Some(b'-')) {
                p += 1;
            }
            if !bytes.get(p).map_or(false, u8::is_ascii_digit) {
                return Err(DecodeError::InvalidNumber { offset: start });
            }
            while bytes.get(p).map_or(false, u8::is_ascii_digit) {
                p += 1;
            }
        }

        let span = &self.input[start..p];
        let number = if is_float {
            span.parse::<f64>()
                .map(Number::Float)
                .map_err(|_| DecodeError::InvalidNumber { offset: start })?
        } else {
            BigInt::from_str(span)
                .map(Number::Int)
                .map_err(|_| DecodeError::InvalidNumber { offset: start })?
        };
        self.position = p;
        Ok(Value::Number(number))
    }

    fn decode_array(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        self.position += 1;
        let mut items = Vec::new();
        let mut state = ArrayState::ItemOrClose;
        while state != ArrayState::Done {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Err(DecodeError::UnterminatedArray { offset: start });
            };
            match state {
                ArrayState::ItemOrClose if c == b']' => {
                    self.position += 1;
                    state = ArrayState::Done;
                }
                ArrayState::ItemOrClose | ArrayState::Item => {
                    if c == b',' || c == b']' {
                        return Err(DecodeError::ExpectedArrayItem {
                            offset: self.position,
                        });
                    }
                    items.push(self.decode_value()?);
                    state = ArrayState::CommaOrClose;
                }
                ArrayState::CommaOrClose => match c {
                    b']' => {
                        self.position += 1;
                        state = ArrayState::Done;
                    }
                    b',' => {
                        self.position += 1;
                        state = ArrayState::Item;
                    }
                    _ => {
                        return Err(DecodeError::ExpectedCommaOrCloseBracket {
                            offset: self.position,
                        })
                    }
                },
                ArrayState::Done => unreachable!(),
            }
        }
        Ok(Value::array(items))
    }

    fn decode_object(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        self.position += 1;
        let mut map = Map::new();
        let mut state = ObjectState::KeyOrClose;
        while state != ObjectState::Done {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Err(DecodeError::UnterminatedObject { offset: start });
            };
            match state {
                ObjectState::KeyOrClose if c == b'}' => {
                    self.position += 1;
                    state = ObjectState::Done;
                }
                ObjectState::KeyOrClose | ObjectState::Key => {
                    if c != b'"' {
                        return Err(DecodeError::ExpectedPropertyName {
                            offset: self.position,
                        });
                    }
                    let key = self.decode_string()?;
                    self.skip_whitespace();
                    if self.peek() != Some(b':') {
                        return Err(DecodeError::ExpectedColon {
                            offset: self.position,
                        });
                    }
                    self.position += 1;
                    self.skip_whitespace();
                    if matches!(self.peek(), Some(b',') | Some(b'}')) {
                        return Err(DecodeError::ExpectedPropertyValue {
                            offset: self.position,
                        });
                    }
                    let value = self.decode_value()?;
                    // duplicate keys: last write wins, position kept
                    map.insert(key, value);
                    state = ObjectState::CommaOrClose;
                }
                ObjectState::CommaOrClose => match c {
                    b'}' => {
                        self.position += 1;
                        state = ObjectState::Done;
                    }
                    b',' => {
                        self.position += 1;
                        state = ObjectState::Key;
                    }
                    _ => {
                        return Err(DecodeError::ExpectedCommaOrCloseBracket {
                            offset: self.position,
                        })
                    }
                },
                ObjectState::Done => unreachable!(),
            }
        }
        Ok(Value::object(map))
    }
}

/// Decodes the escaped span of a string (quotes excluded).
///
/// `offset` is the position of the opening quote, used for error
/// reporting. Unpaired UTF-16 surrogates become U+FFFD since Rust
/// strings cannot hold them.
fn unescape(span: &str, offset: usize) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(span.len());
    let mut chars = span.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let unit = read_hex4(&mut chars, offset)?;
                let cp = if (0xD800..=0xDBFF).contains(&unit) {
                    let mut ahead = chars.clone();
                    match (ahead.next(), ahead.next()) {
                        (Some('\\'), Some('u')) => {
                            let low = read_hex4(&mut ahead, offset)?;
                            if (0xDC00..=0xDFFF).contains(&low) {
                                chars = ahead;
                                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                            } else {
                                0xFFFD
                            }
                        }
                        _ => 0xFFFD,
                    }
                } else if (0xDC00..=0xDFFF).contains(&unit) {
                    0xFFFD
                } else {
                    unit
                };
                out.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
            }
            Some(other) => {
                return Err(DecodeError::InvalidStringEscape {
                    offset,
                    reason: format!("unrecognized escape sequence '\\{other}'"),
                });
            }
            None => {
                return Err(DecodeError::InvalidStringEscape {
                    offset,
                    reason: "dangling backslash at end of string".to_string(),
                });
            }
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>, offset: usize) -> Result<u32, DecodeError> {
    let mut cp = 0;
    for _ in 0..4 {
        let c = chars.next().ok_or_else(|| DecodeError::InvalidStringEscape {
            offset,
            reason: "truncated \\u escape".to_string(),
        })?;
        let digit = c.to_digit(16).ok_or_else(|| DecodeError::InvalidStringEscape {
            offset,
            reason: format!("invalid hex digit '{c}' in \\u escape"),
        })?;
        cp = cp * 16 + digit;
    }
    Ok(cp)
}
