use serde_json::Value;

use crate::util::parse_index;

/// Look up one token inside a value.
///
/// Objects are indexed by key, arrays by canonical index. `-` and scalars
/// resolve to nothing.
pub fn step<'a>(value: &'a Value, token: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(token),
        Value::Array(arr) => arr.get(parse_index(token)?),
        _ => None,
    }
}

/// Mutable counterpart of [`step`].
pub fn step_mut<'a>(value: &'a mut Value, token: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(token),
        Value::Array(arr) => arr.get_mut(parse_index(token)?),
        _ => None,
    }
}
