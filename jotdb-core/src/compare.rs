//! Structural clone and comparison of values.
//!
//! [`deep_equal`] is the nested-value equality the evaluator uses for object and array
//! query-values, and it backs `PartialEq` for [`Value`]. Object comparison is
//! order-independent; array comparison is positional.

use crate::value::{Map, Value, field};

/// Returns a structural copy of `value` sharing nothing with the source.
///
/// Values own their children, so this is `Clone::clone`; it is spelled out to mark
/// the places that rely on getting an independent tree.
pub fn deep_clone(value: &Value) -> Value {
    value.clone()
}

/// Recursive structural equality.
///
/// - `Null` equals only `Null`.
/// - Arrays are equal if they have the same length and equal elements in order.
/// - Objects are equal if they have the same number of keys and every key of `a`
///   exists in `b` with an equal value, in any order.
/// - Primitives compare by value; a not-a-number never equals anything.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, other) | (other, Value::Null) => other.is_null(),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(l, r)| deep_equal(l, r))
        },
        (Value::Object(left), Value::Object(right)) => maps_equal(left, right),
        _ => strict_equal(a, b),
    }
}

/// Compares two documents with [`deep_equal`] semantics.
pub fn maps_equal(left: &Map, right: &Map) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| deep_equal(value, field(right, key)))
}

/// Identity comparison of primitives. Objects and arrays are never strictly equal here;
/// use [`deep_equal`] for them.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Absent, Value::Absent) => true,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    use crate::normalize::normalize;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn null_equals_only_null() {
        assert!(deep_equal(&Value::Null, &Value::Null));
        assert!(!deep_equal(&Value::Null, &Value::Absent));
        assert!(!deep_equal(&Value::Null, &value(json!(0))));
        assert!(!deep_equal(&value(json!({})), &Value::Null));
    }

    #[test]
    fn objects_ignore_key_order() {
        assert!(deep_equal(
            &value(json!({ "a": 1, "b": [1, 2] })),
            &value(json!({ "b": [1, 2], "a": 1 })),
        ));
        assert!(!deep_equal(
            &value(json!({ "a": 1 })),
            &value(json!({ "a": 1, "b": 2 })),
        ));
        assert!(!deep_equal(
            &value(json!({ "a": 1, "c": 2 })),
            &value(json!({ "a": 1, "b": 2 })),
        ));
    }

    #[test]
    fn arrays_compare_positionally() {
        assert!(deep_equal(&value(json!([1, "x", null])), &value(json!([1, "x", null]))));
        assert!(!deep_equal(&value(json!([1, 2])), &value(json!([2, 1]))));
        assert!(!deep_equal(&value(json!([1, 2])), &value(json!([1, 2, 3]))));
    }

    #[test]
    fn not_a_number_is_never_equal() {
        let nan = Value::Number(f64::NAN);
        assert!(!deep_equal(&nan, &nan));
    }

    #[test]
    fn clone_is_independent() {
        let original = value(json!({ "nested": { "list": [1, 2, 3] } }));
        let mut copy = deep_clone(&original);

        if let Some(Value::Object(nested)) = copy.as_object_mut().unwrap().get_mut("nested") {
            nested.insert("list".to_string(), Value::from("replaced"));
        }

        assert_eq!(original, value(json!({ "nested": { "list": [1, 2, 3] } })));
        assert_ne!(original, copy);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1_000_000i64..1_000_000).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-c]", inner), 0..4)
                    .prop_map(|entries| entries.into_iter().collect::<Value>()),
            ]
        })
    }

    proptest! {
        #[test]
        fn equality_is_reflexive(v in arb_value()) {
            let v = normalize(v);
            prop_assert!(deep_equal(&v, &v));
        }

        #[test]
        fn equality_is_symmetric(a in arb_value(), b in arb_value()) {
            prop_assert_eq!(deep_equal(&a, &b), deep_equal(&b, &a));
        }
    }
}
