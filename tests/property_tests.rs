//! Property-based tests - pragmatic approach testing core codec guarantees
//!
//! These tests complement the unit and integration tests by verifying the
//! roundtrip and output invariants across a wide range of generated values.

use jsonx::{decode, encode, Value};
use proptest::prelude::*;

fn roundtrip(value: &Value) -> bool {
    match encode(value) {
        Ok(encoded) => match decode(&encoded) {
            Ok(decoded) => *value == decoded,
            Err(e) => {
                eprintln!("decode failed: {e}");
                eprintln!("encoded was: {encoded}");
                false
            }
        },
        Err(e) => {
            eprintln!("encode failed: {e}");
            false
        }
    }
}

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite floats only", |f| f.is_finite())
            .prop_map(Value::from),
        any::<String>().prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::array),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|entries| Value::object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    // Test primitive tokens
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&Value::from(n)));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&Value::from(f)));
    }

    #[test]
    fn prop_float_stays_float(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let encoded = encode(&Value::from(f)).unwrap();
        let decoded = decode(&encoded).unwrap();
        prop_assert!(decoded.as_number().unwrap().is_float());
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&Value::from(s)));
    }

    #[test]
    fn prop_string_output_is_ascii(s in any::<String>()) {
        let encoded = encode(&Value::from(s)).unwrap();
        prop_assert!(encoded.is_ascii());
    }

    // Test full trees
    #[test]
    fn prop_tree(value in value_strategy()) {
        prop_assert!(roundtrip(&value));
    }

    #[test]
    fn prop_encode_is_stable(value in value_strategy()) {
        let once = encode(&value).unwrap();
        let twice = encode(&decode(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
