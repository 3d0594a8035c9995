//! JSON codec for patch operations.
//!
//! Converts operations to and from raw `serde_json::Value`s in the RFC 6902
//! wire format. Unlike the serde derive on [`Operation`], decoding here keeps
//! unknown operations around so they can be reported per entry.

use rfc6902_pointer::{Pointer, PointerError};
use serde_json::{json, Map, Value};

use crate::types::Operation;

fn decode_pointer(map: &Map<String, Value>, field: &str) -> Result<Option<Pointer>, PointerError> {
    match map.get(field).and_then(Value::as_str) {
        Some(raw) => Pointer::from_json(raw).map(Some),
        None => Ok(None),
    }
}

/// Decode one raw operation.
///
/// `Ok(None)` means the value is not a well-formed operation (unknown `op`,
/// or a required member is absent).
///
/// # Errors
///
/// Returns a [`PointerError`] when `path` or `from` is not a valid pointer.
pub fn from_json(value: &Value) -> Result<Option<Operation>, PointerError> {
    let Some(map) = value.as_object() else {
        return Ok(None);
    };
    let op = map.get("op").and_then(Value::as_str).unwrap_or_default();
    let with_value = |build: fn(Pointer, Value) -> Operation| -> Result<Option<Operation>, PointerError> {
        let path = decode_pointer(map, "path")?;
        Ok(path.zip(map.get("value").cloned()).map(|(path, value)| build(path, value)))
    };
    let with_from = |build: fn(Pointer, Pointer) -> Operation| -> Result<Option<Operation>, PointerError> {
        let from = decode_pointer(map, "from")?;
        let path = decode_pointer(map, "path")?;
        Ok(from.zip(path).map(|(from, path)| build(from, path)))
    };
    match op {
        "add" => with_value(|path, value| Operation::Add { path, value }),
        "replace" => with_value(|path, value| Operation::Replace { path, value }),
        "test" => with_value(|path, value| Operation::Test { path, value }),
        "remove" => Ok(decode_pointer(map, "path")?.map(|path| Operation::Remove { path })),
        "move" => with_from(|from, path| Operation::Move { from, path }),
        "copy" => with_from(|from, path| Operation::Copy { from, path }),
        _ => Ok(None),
    }
}

/// Decode every entry of a raw patch, keeping unknown ones as `None`.
///
/// # Errors
///
/// Fails on the first entry carrying a malformed pointer.
pub fn from_json_patch(patch: &[Value]) -> Result<Vec<Option<Operation>>, PointerError> {
    patch.iter().map(from_json).collect()
}

/// Serialize an operation to its wire form.
pub fn to_json(op: &Operation) -> Value {
    match op {
        Operation::Add { path, value }
        | Operation::Replace { path, value }
        | Operation::Test { path, value } => json!({
            "op": op.op_name(),
            "path": path.to_string(),
            "value": value
        }),
        Operation::Remove { path } => json!({
            "op": "remove",
            "path": path.to_string()
        }),
        Operation::Move { from, path } | Operation::Copy { from, path } => json!({
            "op": op.op_name(),
            "from": from.to_string(),
            "path": path.to_string()
        }),
    }
}

/// Serialize a whole patch to a JSON array.
pub fn to_json_patch(ops: &[Operation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}
