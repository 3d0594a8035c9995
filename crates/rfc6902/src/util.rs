//! Value classification and structural equality.

use serde_json::Value;

/// Runtime shape of a JSON value. Arrays are never classified as objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

pub fn object_type(value: &Value) -> ObjectType {
    match value {
        Value::Null => ObjectType::Null,
        Value::Bool(_) => ObjectType::Boolean,
        Value::Number(_) => ObjectType::Number,
        Value::String(_) => ObjectType::String,
        Value::Array(_) => ObjectType::Array,
        Value::Object(_) => ObjectType::Object,
    }
}

/// Structural equality between two JSON values.
///
/// Numbers compare by numeric value, so `1` equals `1.0`. Object key order
/// is ignored.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use rfc6902::util::compare;
///
/// assert!(compare(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
/// assert!(!compare(&json!([1, 2]), &json!([2, 1])));
/// ```
pub fn compare(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| compare(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| compare(x, y)))
        }
        _ => false,
    }
}

/// True when both values are equal scalars.
///
/// Containers are never identical here; their equality is established by
/// diffing them.
pub fn is_identical_scalar(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => compare(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify() {
        assert_eq!(object_type(&json!(null)), ObjectType::Null);
        assert_eq!(object_type(&json!(true)), ObjectType::Boolean);
        assert_eq!(object_type(&json!(1.5)), ObjectType::Number);
        assert_eq!(object_type(&json!("s")), ObjectType::String);
        assert_eq!(object_type(&json!([])), ObjectType::Array);
        assert_eq!(object_type(&json!({})), ObjectType::Object);
    }

    #[test]
    fn compare_numbers_by_value() {
        assert!(compare(&json!(1), &json!(1.0)));
        assert!(compare(&json!(-3), &json!(-3)));
        assert!(!compare(&json!(1), &json!(2)));
        assert!(!compare(&json!(1), &json!("1")));
    }

    #[test]
    fn compare_objects_ignore_order() {
        assert!(compare(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!compare(&json!({"a": 1}), &json!({"a": 1, "b": null})));
    }

    #[test]
    fn compare_distinguishes_null_from_missing_shape() {
        assert!(!compare(&json!(null), &json!({})));
        assert!(!compare(&json!([]), &json!({})));
    }

    #[test]
    fn identical_scalar_excludes_containers() {
        assert!(is_identical_scalar(&json!("x"), &json!("x")));
        assert!(!is_identical_scalar(&json!([]), &json!([])));
        assert!(!is_identical_scalar(&json!(null), &json!(false)));
    }
}
