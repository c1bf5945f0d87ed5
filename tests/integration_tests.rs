use chrono::NaiveDate;
use jsonx::{
    decode, decode_with_options, encode, encode_with_options, jsonx, to_value, DecodeError,
    DecodeOptions, EncodeError, EncodeOptions, Map, OpaqueValue, Value,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

fn assert_roundtrip(text: &str) {
    let value = decode(text).unwrap();
    let encoded = encode(&value).unwrap();
    assert_eq!(encoded, text, "canonical form should re-encode unchanged");
    assert_eq!(decode(&encoded).unwrap(), value);
}

#[test]
fn test_document_roundtrips() {
    assert_roundtrip("null");
    assert_roundtrip("true");
    assert_roundtrip("[]");
    assert_roundtrip("{}");
    assert_roundtrip(r#"{"id": 7, "rate": 0.5, "tags": ["a", "b"], "extra": null}"#);
    assert_roundtrip(r#"[[1, 2], {"nested": {"deep": [true, false]}}]"#);
    assert_roundtrip("123456789012345678901234567890");
}

#[test]
fn test_extended_literal_documents_reencode() {
    // NaN is unequal to itself, so the structural-equality helper does
    // not apply; check the tokens instead
    let text = "[NaN, Infinity, -Infinity]";
    let value = decode(text).unwrap();
    let encoded = encode(&value).unwrap();
    assert_eq!(encoded, text);

    let again = decode(&encoded).unwrap();
    let items = again.as_array().unwrap();
    assert!(items[0].as_f64().unwrap().is_nan());
    assert_eq!(items[1].as_f64(), Some(f64::INFINITY));
    assert_eq!(items[2].as_f64(), Some(f64::NEG_INFINITY));
}

#[test]
fn test_escape_roundtrip_is_idempotent() {
    let original = Value::from("a\"b\\c\n\t\u{e9}\u{1F600}");
    let once = encode(&original).unwrap();
    let decoded = decode(&once).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(encode(&decoded).unwrap(), once);
}

#[test]
fn test_escape_exact_form() {
    assert_eq!(encode(&Value::from("a\"b\\c")).unwrap(), r#""a\"b\\c""#);
}

#[test]
fn test_number_fidelity() {
    for text in ["0", "-0", "123"] {
        assert!(decode(text).unwrap().as_number().unwrap().is_int(), "{text}");
    }
    for text in ["1.5", "1e10", "-3.14e-2"] {
        assert!(decode(text).unwrap().as_number().unwrap().is_float(), "{text}");
    }
    assert_eq!(encode(&decode("1e10").unwrap()).unwrap(), "10000000000.0");
    assert_eq!(encode(&decode("-0").unwrap()).unwrap(), "0");
}

#[test]
fn test_error_offsets() {
    assert_eq!(
        decode("[1, 2").unwrap_err(),
        DecodeError::UnterminatedArray { offset: 0 }
    );
    assert_eq!(
        decode(r#"{"a": }"#).unwrap_err(),
        DecodeError::ExpectedPropertyValue { offset: 6 }
    );
    assert_eq!(
        decode("[1,,2]").unwrap_err(),
        DecodeError::ExpectedArrayItem { offset: 3 }
    );
}

#[test]
fn test_duplicate_keys_last_write_wins() {
    let value = decode(r#"{"a": 1, "a": 2, "a": 3}"#).unwrap();
    assert_eq!(encode(&value).unwrap(), r#"{"a": 3}"#);
}

#[test]
fn test_nesting_limits_both_directions() {
    let deep_text = "[".repeat(513);
    assert!(matches!(
        decode(&deep_text).unwrap_err(),
        DecodeError::NestingTooDeep { .. }
    ));

    let mut deep_value = Value::Null;
    for _ in 0..513 {
        deep_value = Value::array(vec![deep_value]);
    }
    assert_eq!(encode(&deep_value).unwrap_err(), EncodeError::NestingTooDeep);
}

#[test]
fn test_cycle_detection() {
    let items = Rc::new(RefCell::new(Vec::new()));
    items.borrow_mut().push(Value::Array(items.clone()));
    assert_eq!(
        encode(&Value::Array(items)).unwrap_err(),
        EncodeError::SelfReferential
    );
}

#[test]
fn test_date_formats() {
    let date = Value::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(encode(&date).unwrap(), "\"2024-01-15\"");

    let options = EncodeOptions::new().with_date_format("%Y/%m/%d");
    assert_eq!(encode_with_options(&date, options).unwrap(), "\"2024/01/15\"");
}

#[derive(Debug)]
struct SessionHandle {
    id: u32,
}

impl OpaqueValue for SessionHandle {
    fn type_name(&self) -> &str {
        "SessionHandle"
    }
}

#[test]
fn test_fallback_resolver_end_to_end() {
    let mut map = Map::new();
    map.insert("user".to_string(), jsonx!("alice"));
    map.insert(
        "session".to_string(),
        Value::Opaque(Rc::new(SessionHandle { id: 17 })),
    );
    let value = Value::object(map);

    assert_eq!(
        encode(&value).unwrap_err(),
        EncodeError::UnsupportedType("SessionHandle".to_string())
    );

    let options = EncodeOptions::new().with_fallback(|unresolved| match unresolved {
        Value::Opaque(_) => Ok(Value::from("session:17")),
        _ => Err("unexpected value".to_string()),
    });
    assert_eq!(
        encode_with_options(&value, options).unwrap(),
        r#"{"user": "alice", "session": "session:17"}"#
    );
}

#[test]
fn test_fallback_mutation_is_observed() {
    let items = Rc::new(RefCell::new(vec![
        Value::from(1),
        Value::Opaque(Rc::new(SessionHandle { id: 1 })),
    ]));
    let handle = items.clone();
    let options = EncodeOptions::new().with_fallback(move |_| {
        handle.borrow_mut().push(Value::from(99));
        Ok(Value::Null)
    });

    assert_eq!(
        encode_with_options(&Value::Array(items), options).unwrap(),
        "[1, null, 99]"
    );
}

#[test]
fn test_decode_options_depth() {
    let options = DecodeOptions::new().with_max_depth(3);
    assert!(decode_with_options("[[[1]]]", options.clone()).is_ok());
    assert!(matches!(
        decode_with_options("[[[[1]]]]", options).unwrap_err(),
        DecodeError::NestingTooDeep { .. }
    ));
}

#[test]
fn test_serde_interop_with_serde_json() {
    let value = decode(r#"{"a": [1, true, "x"], "b": 2.5}"#).unwrap();
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"{"a":[1,true,"x"],"b":2.5}"#);

    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_to_value_matches_decoded_document() {
    #[derive(Serialize)]
    struct Reading {
        sensor: String,
        values: Vec<i64>,
        ok: bool,
    }

    let value = to_value(&Reading {
        sensor: "a1".to_string(),
        values: vec![1, 2],
        ok: false,
    })
    .unwrap();
    let decoded = decode(r#"{"sensor": "a1", "values": [1, 2], "ok": false}"#).unwrap();
    assert_eq!(value, decoded);
}

#[test]
fn test_shared_subtrees_encode_twice() {
    let shared = Value::object({
        let mut map = Map::new();
        map.insert("shared".to_string(), Value::Bool(true));
        map
    });
    let value = Value::array(vec![shared.clone(), shared]);
    assert_eq!(
        encode(&value).unwrap(),
        r#"[{"shared": true}, {"shared": true}]"#
    );
}
