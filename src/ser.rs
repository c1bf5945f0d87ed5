//! JSON encoding.
//!
//! This module provides the [`Encoder`] that renders a [`Value`] graph
//! into JSON text, plus [`to_value`] for turning any `Serialize` type
//! into a [`Value`].
//!
//! ## Overview
//!
//! - **Pure ASCII output**: every non-ASCII character is escaped, so the
//!   output survives any 8-bit transport
//! - **Shared-container aware**: reference cycles are detected and
//!   reported instead of recursing forever, and a fallback resolver that
//!   mutates a container mid-encode is observed
//! - **Extended tokens**: non-finite floats encode as `NaN`, `Infinity`
//!   and `-Infinity`
//! - **Date/time formatting**: temporal values render through the
//!   strftime formats carried by [`EncodeOptions`]
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use jsonx::{encode, jsonx};
//!
//! let value = jsonx!({"id": 7, "tags": ["a", "b"]});
//! assert_eq!(encode(&value).unwrap(), r#"{"id": 7, "tags": ["a", "b"]}"#);
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use jsonx::{Encoder, EncodeOptions, Value};
//!
//! let mut encoder = Encoder::new(EncodeOptions::new());
//! encoder.encode_value(&Value::from(2.5)).unwrap();
//! assert_eq!(encoder.into_inner(), "2.5");
//! ```

use crate::{EncodeError, EncodeOptions, Map, Number, Value};
use serde::{ser, Serialize};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

/// The JSON encoder.
///
/// Renders [`Value`] graphs into JSON text. Created via [`Encoder::new`]
/// with per-call options; most callers go through
/// [`encode`](crate::encode) instead.
pub struct Encoder {
    output: String,
    options: EncodeOptions,
    depth: usize,
    // identity stack of containers currently being walked
    active: Vec<usize>,
}

impl Encoder {
    #[must_use]
    pub fn new(options: EncodeOptions) -> Self {
        Encoder {
            output: String::with_capacity(256),
            options,
            depth: 0,
            active: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Encodes one value, appending to the output buffer.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] for cycles, excessive nesting, failed
    /// resolvers and values with no JSON representation.
    pub fn encode_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Bool(true) => {
                self.output.push_str("true");
                Ok(())
            }
            Value::Bool(false) => {
                self.output.push_str("false");
                Ok(())
            }
            Value::Null => {
                self.output.push_str("null");
                Ok(())
            }
            Value::Text(s) => {
                self.write_quoted(s);
                Ok(())
            }
            Value::Number(n) => {
                self.output.push_str(&n.to_string());
                Ok(())
            }
            Value::Array(items) => self.encode_array(items),
            Value::Object(map) => self.encode_object(map),
            Value::Date(d) => {
                let format = self.options.date_format.clone();
                self.write_temporal(d.format(&format), "date")
            }
            Value::Time(t) => {
                let format = self.options.time_format.clone();
                self.write_temporal(t.format(&format), "time")
            }
            Value::DateTime(dt) => {
                let format = self.options.effective_datetime_format();
                self.write_temporal(dt.format(&format), "datetime")
            }
            Value::Opaque(_) => self.encode_opaque(value),
        }
    }

    // depth counts container levels only, matching the decoder
    fn descend(&mut self) -> Result<(), EncodeError> {
        if self.depth >= self.options.max_depth {
            return Err(EncodeError::NestingTooDeep);
        }
        self.depth += 1;
        Ok(())
    }

    fn encode_array(&mut self, items: &Rc<RefCell<Vec<Value>>>) -> Result<(), EncodeError> {
        self.descend()?;
        let id = Rc::as_ptr(items) as usize;
        if self.active.contains(&id) {
            self.depth -= 1;
            return Err(EncodeError::SelfReferential);
        }
        self.active.push(id);
        let result = self.write_array_items(items);
        self.active.pop();
        self.depth -= 1;
        result
    }

    fn write_array_items(&mut self, items: &Rc<RefCell<Vec<Value>>>) -> Result<(), EncodeError> {
        self.output.push('[');
        let mut index = 0;
        loop {
            // re-read the length every iteration; a fallback resolver may
            // have grown or shrunk the array while we were inside it
            let item = match items.borrow().get(index) {
                Some(item) => item.clone(),
                None => break,
            };
            if index > 0 {
                self.output.push_str(", ");
            }
            self.encode_value(&item)?;
            index += 1;
        }
        self.output.push(']');
        Ok(())
    }

    fn encode_object(&mut self, map: &Rc<RefCell<Map>>) -> Result<(), EncodeError> {
        self.descend()?;
        let id = Rc::as_ptr(map) as usize;
        if self.active.contains(&id) {
            self.depth -= 1;
            return Err(EncodeError::SelfReferential);
        }
        self.active.push(id);
        let result = self.write_object_entries(map);
        self.active.pop();
        self.depth -= 1;
        result
    }

    fn write_object_entries(&mut self, map: &Rc<RefCell<Map>>) -> Result<(), EncodeError> {
        self.output.push('{');
        let mut index = 0;
        loop {
            let (key, value) = match map.borrow().get_index(index) {
                Some((key, value)) => (key.clone(), value.clone()),
                None => break,
            };
            if index > 0 {
                self.output.push_str(", ");
            }
            self.write_quoted(&key);
            self.output.push_str(": ");
            self.encode_value(&value)?;
            index += 1;
        }
        self.output.push('}');
        Ok(())
    }

    fn encode_opaque(&mut self, value: &Value) -> Result<(), EncodeError> {
        let Value::Opaque(opaque) = value else {
            unreachable!()
        };
        if let Some(f) = opaque.as_f64() {
            // integral doubles render in integer form, matching how a
            // numeric host object with a whole value reads best
            if f.is_finite() && f.fract() == 0.0 {
                // negative zero has no integer form
                let f = if f == 0.0 { 0.0 } else { f };
                self.output.push_str(&format!("{f:.0}"));
            } else {
                self.output.push_str(&Number::Float(f).to_string());
            }
            return Ok(());
        }
        if let Some(i) = opaque.as_bigint() {
            self.output.push_str(&i.to_string());
            return Ok(());
        }
        if let Some(resolved) = self.options.run_fallback(value) {
            let replacement = resolved?;
            // a resolver may hand back another opaque; bound the re-entry
            self.descend()?;
            let result = self.encode_value(&replacement);
            self.depth -= 1;
            return result;
        }
        Err(EncodeError::UnsupportedType(opaque.type_name().to_string()))
    }

    fn write_temporal(&mut self, formatted: impl Display, kind: &str) -> Result<(), EncodeError> {
        use std::fmt::Write;
        // chrono reports bad format specifiers through fmt::Error
        let mut rendered = String::new();
        write!(rendered, "{formatted}")
            .map_err(|_| EncodeError::UnsupportedType(kind.to_string()))?;
        self.write_quoted(&rendered);
        Ok(())
    }

    #[inline]
    fn write_quoted(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\t' => self.output.push_str("\\t"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\u{000C}' => self.output.push_str("\\f"), // form feed
                '\u{0008}' => self.output.push_str("\\b"), // backspace
                _ => {
                    let cp = ch as u32;
                    if cp < 0x20 || (0x7F..0x100).contains(&cp) {
                        self.output.push_str(&format!("\\u00{cp:02x}"));
                    } else if cp < 0x7F {
                        self.output.push(ch);
                    } else if cp < 0x10000 {
                        self.output.push_str(&format!("\\u{cp:04x}"));
                    } else {
                        let v = cp - 0x10000;
                        let high = 0xD800 + (v >> 10);
                        let low = 0xDC00 + (v & 0x3FF);
                        self.output.push_str(&format!("\\u{high:04x}\\u{low:04x}"));
                    }
                }
            }
        }
        self.output.push('"');
    }
}

/// Converts any `Serialize` type into a [`Value`].
///
/// Map keys must serialize as strings; anything else fails with
/// [`EncodeError::InvalidKeyType`].
///
/// # Examples
///
/// ```rust
/// use jsonx::to_value;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.as_object().unwrap().get("x").and_then(|v| v.as_i64()), Some(1));
/// ```
///
/// # Errors
///
/// Returns an [`EncodeError`] for non-string map keys and serde shapes
/// with no JSON mapping (enum variants with payloads).
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    value.serialize(ValueSerializer)
}

/// Serde serializer that builds a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeObject {
    map: Map,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeObject;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodeError> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(EncodeError::UnsupportedType("enum newtype variant".to_string()))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec, EncodeError> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec, EncodeError> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeVec, EncodeError> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec, EncodeError> {
        Err(EncodeError::UnsupportedType("enum tuple variant".to_string()))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeObject, EncodeError> {
        Ok(SerializeObject::new())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeObject, EncodeError> {
        Ok(SerializeObject::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeObject, EncodeError> {
        Err(EncodeError::UnsupportedType("enum struct variant".to_string()))
    }
}

impl SerializeVec {
    fn new() -> Self {
        SerializeVec { vec: Vec::new() }
    }
}

impl SerializeObject {
    fn new() -> Self {
        SerializeObject {
            map: Map::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::array(self.vec))
    }
}

impl ser::SerializeMap for SerializeObject {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::Text(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(EncodeError::InvalidKeyType),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.current_key.take().ok_or_else(|| {
            EncodeError::Message("serialize_value called without serialize_key".to_string())
        })?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::object(self.map))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeObject {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::object(self.map))
    }
}
