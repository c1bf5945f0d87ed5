//! Dynamic value representation for JSON documents.
//!
//! This module provides the [`Value`] enum which represents any value the
//! codec can decode or encode, plus the [`Number`] type and the
//! [`OpaqueValue`] extension trait.
//!
//! ## Core Types
//!
//! - [`Value`]: any JSON value (null, bool, number, text, array, object)
//!   plus the encodable extensions (date, time, datetime, opaque)
//! - [`Number`]: an arbitrary-precision integer or a double, kept apart
//!   so that `7` and `7.0` survive a round trip distinctly
//! - [`OpaqueValue`]: host objects with no native JSON form, encodable
//!   through their numeric probes or a fallback resolver
//!
//! ## Shared containers
//!
//! Arrays and objects are held behind `Rc<RefCell<..>>` handles. Several
//! values can share one container, cloning a container value is shallow,
//! and a fallback resolver may mutate a container while it is being
//! encoded. The encoder detects reference cycles and reports them as
//! [`SelfReferential`](crate::EncodeError::SelfReferential) instead of
//! recursing forever.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use jsonx::{jsonx, Value};
//!
//! let value = jsonx!({
//!     "name": "Alice",
//!     "scores": [1, 2.5, null]
//! });
//! assert!(value.is_object());
//!
//! let scores = value.as_object().unwrap().get("scores").cloned().unwrap();
//! assert_eq!(scores.as_array().unwrap().len(), 3);
//! ```

use crate::Map;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A dynamically-typed representation of any JSON-encodable value.
///
/// Beyond the six JSON types this carries date, time and datetime values
/// (encoded through configurable strftime formats) and [`Opaque`] host
/// objects (encoded through numeric probes or a fallback resolver).
///
/// # Examples
///
/// ```rust
/// use jsonx::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::from(42);
/// let text = Value::from("hello");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_text());
/// ```
///
/// [`Opaque`]: Value::Opaque
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Map>>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Opaque(Rc<dyn OpaqueValue>),
}

/// A host object with no native JSON representation.
///
/// The encoder tries the numeric probes first: a value answering
/// [`as_f64`](OpaqueValue::as_f64) or [`as_bigint`](OpaqueValue::as_bigint)
/// encodes as a number token. Otherwise the configured fallback resolver
/// decides, and with no resolver encoding fails with
/// [`UnsupportedType`](crate::EncodeError::UnsupportedType) naming
/// [`type_name`](OpaqueValue::type_name).
///
/// # Examples
///
/// ```rust
/// use jsonx::{encode, OpaqueValue, Value};
/// use std::rc::Rc;
///
/// #[derive(Debug)]
/// struct Celsius(f64);
///
/// impl OpaqueValue for Celsius {
///     fn type_name(&self) -> &str {
///         "Celsius"
///     }
///     fn as_f64(&self) -> Option<f64> {
///         Some(self.0)
///     }
/// }
///
/// let value = Value::Opaque(Rc::new(Celsius(21.5)));
/// assert_eq!(encode(&value).unwrap(), "21.5");
/// ```
pub trait OpaqueValue: fmt::Debug {
    /// Name used in error messages when the value cannot be encoded.
    fn type_name(&self) -> &str;

    /// Numeric view of this value as a double, if it has one.
    fn as_f64(&self) -> Option<f64> {
        None
    }

    /// Numeric view of this value as a big integer, if it has one.
    ///
    /// Consulted only when [`as_f64`](OpaqueValue::as_f64) returns `None`.
    fn as_bigint(&self) -> Option<BigInt> {
        None
    }
}

/// A numeric value: an arbitrary-precision integer or a double.
///
/// Whether a decoded number is an integer or a float is decided lexically
/// (a `.` or an exponent makes it a float) and the distinction is kept
/// through encoding: `Float(10.0)` encodes as `10.0`, never `10`.
/// Floats admit the extended non-finite tokens `NaN`, `Infinity` and
/// `-Infinity`.
///
/// # Examples
///
/// ```rust
/// use jsonx::Number;
/// use num_bigint::BigInt;
///
/// let integer = Number::Int(BigInt::from(42));
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_int());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it fits.
    ///
    /// Integers convert when in range; floats convert when they have no
    /// fractional part and fit. Non-finite floats return `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonx::Number;
    /// use num_bigint::BigInt;
    ///
    /// assert_eq!(Number::Int(BigInt::from(42)).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => i.to_i64(),
            Number::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64
                {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`.
    ///
    /// Integers too large for a double saturate to infinity.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => i.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    /// Writes the number as a JSON token.
    ///
    /// Integers render as plain decimal digits. Finite floats keep a
    /// fractional marker (`10.0`, not `10`) so the float identity is
    /// visible in the output; non-finite floats render as the extended
    /// tokens `NaN`, `Infinity` and `-Infinity`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) => {
                if v.is_nan() {
                    f.write_str("NaN")
                } else if v.is_infinite() {
                    f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    let repr = v.to_string();
                    if repr.contains('.') || repr.contains('e') || repr.contains('E') {
                        f.write_str(&repr)
                    } else {
                        write!(f, "{repr}.0")
                    }
                }
            }
        }
    }
}

impl From<i8> for Number {
    fn from(value: i8) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<i16> for Number {
    fn from(value: i16) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<u8> for Number {
    fn from(value: u8) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Int(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Value {
    /// Wraps a vector of values in a fresh shared array handle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonx::Value;
    ///
    /// let value = Value::array(vec![Value::from(1), Value::from(2)]);
    /// assert_eq!(value.as_array().unwrap().len(), 2);
    /// ```
    #[must_use]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Wraps a map in a fresh shared object handle.
    #[must_use]
    pub fn object(map: Map) -> Self {
        Value::Object(Rc::new(RefCell::new(map)))
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a text string.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is a date, time or datetime.
    #[inline]
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Value::Date(_) | Value::Time(_) | Value::DateTime(_))
    }

    /// Returns `true` if the value is an opaque host object.
    #[inline]
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque(_))
    }

    /// If the value is a boolean, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonx::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is text, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonx::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a number, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is a number that fits an `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, borrows its items.
    ///
    /// The borrow lives as long as the returned guard; dropping it
    /// releases the container for mutation again.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<Ref<'_, Vec<Value>>> {
        match self {
            Value::Array(items) => Some(items.borrow()),
            _ => None,
        }
    }

    /// If the value is an object, borrows its map.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<Ref<'_, Map>> {
        match self {
            Value::Object(map) => Some(map.borrow()),
            _ => None,
        }
    }

    /// If the value is an array, returns its shared handle.
    ///
    /// Cloning the handle lets a caller (or a fallback resolver) mutate
    /// the array while it is reachable from other values.
    #[inline]
    #[must_use]
    pub fn array_handle(&self) -> Option<&Rc<RefCell<Vec<Value>>>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// If the value is an object, returns its shared handle.
    #[inline]
    #[must_use]
    pub fn object_handle(&self) -> Option<&Rc<RefCell<Map>>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// If the value is a date, returns it.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// If the value is a time, returns it.
    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// If the value is a datetime, returns it.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality; shared containers short-circuit on handle
    /// identity, so comparing a cyclic value to itself terminates.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => {
                std::ptr::eq(Rc::as_ptr(a).cast::<u8>(), Rc::as_ptr(b).cast::<u8>())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as JSON text with default options.
    ///
    /// Values that cannot be encoded (cycles, bare opaques) render as
    /// `<unencodable>` since `Display` cannot carry the error.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::encode(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<unencodable>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(i)) => {
                if let Some(v) = i.to_i64() {
                    serializer.serialize_i64(v)
                } else if let Some(v) = i.to_u64() {
                    serializer.serialize_u64(v)
                } else {
                    serializer.serialize_str(&i.to_string())
                }
            }
            Value::Number(Number::Float(v)) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                use serde::ser::SerializeSeq;
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                use serde::ser::SerializeMap;
                let map = map.borrow();
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => serializer.serialize_str(&t.format("%H:%M:%S").to_string()),
            Value::DateTime(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            Value::Opaque(o) => Err(serde::ser::Error::custom(format!(
                "object of type {} is not JSON encodable",
                o.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::Text(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(element) = seq.next_element()? {
                    items.push(element);
                }
                Ok(Value::array(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut out = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    out.insert(key, value);
                }
                Ok(Value::object(out))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::EncodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                crate::EncodeError::Message(format!("cannot convert {n} to i64"))
            }),
            _ => Err(crate::EncodeError::Message(format!(
                "expected integer, found {value:?}"
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::EncodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::EncodeError::Message(format!(
                "expected number, found {value:?}"
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::EncodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::EncodeError::Message(format!(
                "expected bool, found {other:?}"
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::EncodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(crate::EncodeError::Message(format!(
                "expected string, found {other:?}"
            ))),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Number(Number::Int(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::object(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}
