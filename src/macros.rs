/// Builds a [`Value`](crate::Value) from JSON-shaped syntax.
///
/// Literals, arrays and `"key": value` objects nest freely; a bare
/// expression goes through `Value::from`. Each array element and object
/// value must be a single token tree, so wrap multi-token expressions
/// in parentheses.
///
/// # Examples
///
/// ```rust
/// use jsonx::jsonx;
///
/// let value = jsonx!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "extra": null
/// });
/// assert!(value.is_object());
/// ```
#[macro_export]
macro_rules! jsonx {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::array(vec![$($crate::jsonx!($elem)),*])
    };

    ({}) => {
        $crate::Value::object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::jsonx!($value));
        )*
        $crate::Value::object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Value};

    #[test]
    fn test_jsonx_macro_primitives() {
        assert_eq!(jsonx!(null), Value::Null);
        assert_eq!(jsonx!(true), Value::Bool(true));
        assert_eq!(jsonx!(false), Value::Bool(false));
        assert_eq!(jsonx!(42), Value::Number(Number::from(42)));
        assert_eq!(jsonx!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(jsonx!("hello"), Value::Text("hello".to_string()));
    }

    #[test]
    fn test_jsonx_macro_arrays() {
        assert_eq!(jsonx!([]), Value::array(vec![]));

        let value = jsonx!([1, "two", null, [3.5]]);
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], Value::from(1));
        assert_eq!(items[1], Value::from("two"));
        assert_eq!(items[2], Value::Null);
        assert_eq!(items[3], Value::array(vec![Value::from(3.5)]));
    }

    #[test]
    fn test_jsonx_macro_objects() {
        assert_eq!(jsonx!({}), Value::object(crate::Map::new()));

        let value = jsonx!({
            "name": "Alice",
            "age": 30,
            "tags": ["a", "b"]
        });

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object.get("name"), Some(&Value::from("Alice")));
        assert_eq!(object.get("age"), Some(&Value::from(30)));
        assert_eq!(
            object.get("tags"),
            Some(&Value::array(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_jsonx_macro_expressions() {
        let n = 7;
        assert_eq!(jsonx!(n), Value::from(7));
        let items = vec![Value::from(1)];
        assert_eq!(jsonx!(items), Value::array(vec![Value::from(1)]));
    }
}
