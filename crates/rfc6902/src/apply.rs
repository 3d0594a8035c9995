//! Patch engine: applies one operation to a document in place.
//!
//! Every operation is independent; a failure is returned as a value and
//! leaves the document as it was before that operation.

use rfc6902_pointer::{parse_index, Parent, Pointer, APPEND_TOKEN};
use serde_json::Value;

use crate::diff::default_diff;
use crate::types::{Operation, PatchError};

// ── Location primitives ───────────────────────────────────────────────────

/// Insert `value` at `path`: arrays splice (or append on `-`), objects
/// assign, the root is replaced. Gives the value back when there is no
/// container to receive it.
fn insert(object: &mut Value, path: &Pointer, value: Value) -> Result<(), Value> {
    if path.is_root() {
        *object = value;
        return Ok(());
    }
    let key = path.last_token();
    match path.parent_mut(object) {
        Some(Value::Object(map)) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Some(Value::Array(arr)) => {
            if key == APPEND_TOKEN {
                arr.push(value);
                return Ok(());
            }
            match parse_index(key) {
                Some(index) if index <= arr.len() => {
                    arr.insert(index, value);
                    Ok(())
                }
                _ => Err(value),
            }
        }
        _ => Err(value),
    }
}

/// Detach and return the value at `path`. Taking the root leaves `null`.
fn take(object: &mut Value, path: &Pointer) -> Option<Value> {
    if path.is_root() {
        return Some(std::mem::take(object));
    }
    let key = path.last_token();
    match path.parent_mut(object)? {
        Value::Object(map) => map.shift_remove(key),
        Value::Array(arr) => {
            let index = parse_index(key).filter(|index| *index < arr.len())?;
            Some(arr.remove(index))
        }
        _ => None,
    }
}

/// Overwrite the existing value at `path`.
fn overwrite(object: &mut Value, path: &Pointer, value: Value) -> Option<()> {
    if path.is_root() {
        *object = value;
        return Some(());
    }
    let key = path.last_token();
    match path.parent_mut(object)? {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
        }
        Value::Array(arr) => {
            *arr.get_mut(parse_index(key)?)? = value;
        }
        _ => return None,
    }
    Some(())
}

// ── Individual operation applicators ──────────────────────────────────────

fn apply_add(object: &mut Value, path: &Pointer, value: &Value) -> Result<(), PatchError> {
    if path.evaluate(object).parent.is_missing() {
        return Err(PatchError::missing(path));
    }
    insert(object, path, value.clone()).map_err(|_| PatchError::missing(path))
}

fn apply_remove(object: &mut Value, path: &Pointer) -> Result<(), PatchError> {
    if path.evaluate(object).value.is_none() {
        return Err(PatchError::missing(path));
    }
    take(object, path)
        .map(drop)
        .ok_or_else(|| PatchError::missing(path))
}

fn apply_replace(object: &mut Value, path: &Pointer, value: &Value) -> Result<(), PatchError> {
    let endpoint = path.evaluate(object);
    let exists = match endpoint.parent {
        Parent::Root => true,
        Parent::Missing => false,
        Parent::Found(Value::Array(arr)) => {
            parse_index(&endpoint.key).is_some_and(|index| index < arr.len())
        }
        Parent::Found(_) => endpoint.value.is_some(),
    };
    if !exists {
        return Err(PatchError::missing(path));
    }
    overwrite(object, path, value.clone()).ok_or_else(|| PatchError::missing(path))
}

/// Whether `insert` at `path` would find a container that accepts it.
fn can_insert(object: &Value, path: &Pointer) -> bool {
    let endpoint = path.evaluate(object);
    match endpoint.parent {
        Parent::Root => true,
        Parent::Missing => false,
        Parent::Found(Value::Object(_)) => true,
        Parent::Found(Value::Array(arr)) => {
            endpoint.key == APPEND_TOKEN || parse_index(&endpoint.key).is_some_and(|index| index <= arr.len())
        }
        Parent::Found(_) => false,
    }
}

fn apply_move(object: &mut Value, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    if from.evaluate(object).value.is_none() {
        return Err(PatchError::missing(from));
    }
    if from == path {
        return Ok(());
    }
    // A value cannot be moved into one of its own children.
    if from.is_ancestor_of(path) || !can_insert(object, path) {
        return Err(PatchError::missing(path));
    }
    let value = take(object, from).ok_or_else(|| PatchError::missing(from))?;
    if let Err(value) = insert(object, path, value) {
        // Only reachable when `from` shifted the target array; the index is
        // still free for the value to go back to.
        let _ = insert(object, from, value);
        return Err(PatchError::missing(path));
    }
    Ok(())
}

fn apply_copy(object: &mut Value, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    let Some(value) = from.get(object).cloned() else {
        return Err(PatchError::missing(from));
    };
    if path.evaluate(object).parent.is_missing() {
        return Err(PatchError::missing(path));
    }
    insert(object, path, value).map_err(|_| PatchError::missing(path))
}

fn apply_test(object: &Value, path: &Pointer, expected: &Value) -> Result<(), PatchError> {
    let actual = path.get(object);
    let equal = actual.is_some_and(|actual| default_diff(actual, expected, &Pointer::root()).is_empty());
    if equal {
        Ok(())
    } else {
        Err(PatchError::Test {
            actual: actual.cloned(),
            expected: expected.clone(),
        })
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document (in-place mutation).
pub fn apply(object: &mut Value, operation: &Operation) -> Result<(), PatchError> {
    match operation {
        Operation::Add { path, value } => apply_add(object, path, value),
        Operation::Remove { path } => apply_remove(object, path),
        Operation::Replace { path, value } => apply_replace(object, path, value),
        Operation::Move { from, path } => apply_move(object, from, path),
        Operation::Copy { from, path } => apply_copy(object, from, path),
        Operation::Test { path, value } => apply_test(object, path, value),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(s: &str) -> Pointer {
        Pointer::from_json(s).unwrap()
    }

    fn missing(s: &str) -> Result<(), PatchError> {
        Err(PatchError::Missing { path: s.to_string() })
    }

    #[test]
    fn add_to_object() {
        let mut doc = json!({"a": 1});
        apply(&mut doc, &Operation::Add { path: ptr("/b"), value: json!(2) }).unwrap();
        assert_eq!(doc, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn add_overwrites_existing_key() {
        let mut doc = json!({"a": 1});
        apply(&mut doc, &Operation::Add { path: ptr("/a"), value: json!([]) }).unwrap();
        assert_eq!(doc, json!({"a": []}));
    }

    #[test]
    fn add_to_array() {
        let mut doc = json!([1, 2, 3]);
        apply(&mut doc, &Operation::Add { path: ptr("/1"), value: json!(99) }).unwrap();
        assert_eq!(doc, json!([1, 99, 2, 3]));
    }

    #[test]
    fn add_append_array() {
        let mut doc = json!([1, 2]);
        apply(&mut doc, &Operation::Add { path: ptr("/-"), value: json!(3) }).unwrap();
        apply(&mut doc, &Operation::Add { path: ptr("/3"), value: json!(4) }).unwrap();
        assert_eq!(doc, json!([1, 2, 3, 4]));
    }

    #[test]
    fn add_past_end_is_missing() {
        let mut doc = json!([1]);
        let res = apply(&mut doc, &Operation::Add { path: ptr("/5"), value: json!(0) });
        assert_eq!(res, missing("/5"));
        assert_eq!(doc, json!([1]));
    }

    #[test]
    fn add_missing_parent() {
        let mut doc = json!({});
        let res = apply(&mut doc, &Operation::Add { path: ptr("/a/b"), value: json!(1) });
        assert_eq!(res, missing("/a/b"));
    }

    #[test]
    fn add_into_scalar_parent() {
        let mut doc = json!({"a": 1});
        let res = apply(&mut doc, &Operation::Add { path: ptr("/a/b"), value: json!(1) });
        assert_eq!(res, missing("/a/b"));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn add_root_replaces_document() {
        let mut doc = json!({"a": 1});
        apply(&mut doc, &Operation::Add { path: ptr(""), value: json!("x") }).unwrap();
        assert_eq!(doc, json!("x"));
    }

    #[test]
    fn remove_from_object_keeps_order() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        apply(&mut doc, &Operation::Remove { path: ptr("/a") }).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn remove_from_array() {
        let mut doc = json!({"a": [1, 2, 3]});
        apply(&mut doc, &Operation::Remove { path: ptr("/a/0") }).unwrap();
        assert_eq!(doc, json!({"a": [2, 3]}));
    }

    #[test]
    fn remove_missing() {
        let mut doc = json!({});
        assert_eq!(apply(&mut doc, &Operation::Remove { path: ptr("/x") }), missing("/x"));
        let mut doc = json!([1]);
        assert_eq!(apply(&mut doc, &Operation::Remove { path: ptr("/1") }), missing("/1"));
    }

    #[test]
    fn remove_null_value_is_allowed() {
        let mut doc = json!({"a": null});
        apply(&mut doc, &Operation::Remove { path: ptr("/a") }).unwrap();
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn remove_root_leaves_null() {
        let mut doc = json!([1, 2]);
        apply(&mut doc, &Operation::Remove { path: ptr("") }).unwrap();
        assert_eq!(doc, Value::Null);
    }

    #[test]
    fn replace_value() {
        let mut doc = json!({"a": 1, "l": [0, 1]});
        apply(&mut doc, &Operation::Replace { path: ptr("/a"), value: json!(99) }).unwrap();
        apply(&mut doc, &Operation::Replace { path: ptr("/l/1"), value: json!("one") }).unwrap();
        assert_eq!(doc, json!({"a": 99, "l": [0, "one"]}));
    }

    #[test]
    fn replace_missing() {
        let mut doc = json!({"l": [0]});
        let res = apply(&mut doc, &Operation::Replace { path: ptr("/x"), value: json!(1) });
        assert_eq!(res, missing("/x"));
        let res = apply(&mut doc, &Operation::Replace { path: ptr("/l/1"), value: json!(1) });
        assert_eq!(res, missing("/l/1"));
        let res = apply(&mut doc, &Operation::Replace { path: ptr("/l/-"), value: json!(1) });
        assert_eq!(res, missing("/l/-"));
        let res = apply(&mut doc, &Operation::Replace { path: ptr("/q/r"), value: json!(1) });
        assert_eq!(res, missing("/q/r"));
    }

    #[test]
    fn replace_root() {
        let mut doc = json!(1);
        apply(&mut doc, &Operation::Replace { path: ptr(""), value: json!(2) }).unwrap();
        assert_eq!(doc, json!(2));
    }

    #[test]
    fn copy_op() {
        let mut doc = json!({"a": {"x": 1}, "b": {}});
        apply(&mut doc, &Operation::Copy { from: ptr("/a/x"), path: ptr("/b/x") }).unwrap();
        assert_eq!(doc, json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn copy_missing_from_and_path() {
        let mut doc = json!({"a": 1});
        let res = apply(&mut doc, &Operation::Copy { from: ptr("/z"), path: ptr("/b") });
        assert_eq!(res, missing("/z"));
        let res = apply(&mut doc, &Operation::Copy { from: ptr("/a"), path: ptr("/q/r") });
        assert_eq!(res, missing("/q/r"));
    }

    #[test]
    fn move_op() {
        let mut doc = json!({"a": 1, "b": 2});
        apply(&mut doc, &Operation::Move { from: ptr("/a"), path: ptr("/c") }).unwrap();
        assert_eq!(doc, json!({"b": 2, "c": 1}));
    }

    #[test]
    fn move_within_array() {
        let mut doc = json!(["a", "b", "c"]);
        apply(&mut doc, &Operation::Move { from: ptr("/0"), path: ptr("/-") }).unwrap();
        assert_eq!(doc, json!(["b", "c", "a"]));
    }

    #[test]
    fn move_missing_from() {
        let mut doc = json!({"a": 1});
        let res = apply(&mut doc, &Operation::Move { from: ptr("/z"), path: ptr("/b") });
        assert_eq!(res, missing("/z"));
    }

    #[test]
    fn move_into_own_child_keeps_key_order() {
        let mut doc = json!({"a": {"b": 1}, "z": 2});
        let res = apply(&mut doc, &Operation::Move { from: ptr("/a"), path: ptr("/a/c") });
        assert_eq!(res, missing("/a/c"));
        assert_eq!(doc.to_string(), r#"{"a":{"b":1},"z":2}"#);
    }

    #[test]
    fn move_from_root_into_child() {
        let mut doc = json!({"a": 1});
        let res = apply(&mut doc, &Operation::Move { from: ptr(""), path: ptr("/b") });
        assert_eq!(res, missing("/b"));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn move_to_out_of_range_index_keeps_key_order() {
        let mut doc = json!({"k": 1, "z": 2, "arr": []});
        let res = apply(&mut doc, &Operation::Move { from: ptr("/k"), path: ptr("/arr/5") });
        assert_eq!(res, missing("/arr/5"));
        assert_eq!(doc.to_string(), r#"{"k":1,"z":2,"arr":[]}"#);
    }

    #[test]
    fn move_past_end_of_same_array_restores_element() {
        let mut doc = json!(["x", "y"]);
        let res = apply(&mut doc, &Operation::Move { from: ptr("/0"), path: ptr("/2") });
        assert_eq!(res, missing("/2"));
        assert_eq!(doc, json!(["x", "y"]));
    }

    #[test]
    fn move_onto_itself_is_noop() {
        let mut doc = json!({"a": 1, "b": 2});
        apply(&mut doc, &Operation::Move { from: ptr("/a"), path: ptr("/a") }).unwrap();
        assert_eq!(doc.to_string(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn reserved_token_mid_path_is_skipped_on_add() {
        let mut doc = json!({});
        apply(&mut doc, &Operation::Add { path: ptr("/__proto__/x"), value: json!(1) }).unwrap();
        assert_eq!(doc, json!({"x": 1}));
    }

    #[test]
    fn reserved_final_token_absent_on_remove() {
        let mut doc = json!({"a": {}});
        let res = apply(&mut doc, &Operation::Remove { path: ptr("/a/constructor") });
        assert_eq!(res, missing("/a/constructor"));
        assert_eq!(doc, json!({"a": {}}));
    }

    #[test]
    fn reserved_final_token_is_assigned_on_replace() {
        // Evaluation stays on `/a`, so the location counts as existing and
        // the reserved key is written as a plain member.
        let mut doc = json!({"a": {}});
        apply(&mut doc, &Operation::Replace { path: ptr("/a/constructor"), value: json!(1) }).unwrap();
        assert_eq!(doc, json!({"a": {"constructor": 1}}));
    }

    #[test]
    fn test_pass() {
        let mut doc = json!({"a": [1, {"b": 2}]});
        apply(&mut doc, &Operation::Test { path: ptr("/a"), value: json!([1, {"b": 2}]) }).unwrap();
        apply(&mut doc, &Operation::Test { path: ptr("/a/0"), value: json!(1.0) }).unwrap();
    }

    #[test]
    fn test_fail() {
        let mut doc = json!({"a": 42});
        let res = apply(&mut doc, &Operation::Test { path: ptr("/a"), value: json!(99) });
        assert_eq!(
            res,
            Err(PatchError::Test { actual: Some(json!(42)), expected: json!(99) })
        );
        let res = apply(&mut doc, &Operation::Test { path: ptr("/z"), value: json!(null) });
        assert_eq!(res, Err(PatchError::Test { actual: None, expected: json!(null) }));
    }
}
