//! JSON Patch (RFC 6902): diff two JSON documents into a patch, apply
//! patches in place, and build optimistic-concurrency guards.
//!
//! # Example
//!
//! ```
//! use rfc6902::{apply_patch, create_patch};
//! use serde_json::json;
//!
//! let input = json!({"a": 1, "b": [1, 2, 3]});
//! let output = json!({"a": 1, "b": [1, 3], "c": true});
//!
//! let patch = create_patch(&input, &output);
//! let mut doc = input.clone();
//! let results = apply_patch(&mut doc, &patch);
//! assert!(results.iter().all(Result::is_ok));
//! assert_eq!(doc, output);
//! ```

pub mod apply;
pub mod cli;
pub mod codec;
pub mod diff;
pub mod types;
pub mod util;

use rfc6902_pointer::PointerError;
use serde_json::Value;
use tracing::debug;

pub use apply::apply;
pub use diff::{default_diff, diff_any, diff_arrays, diff_objects, Diff};
pub use rfc6902_pointer::Pointer;
pub use types::{ApplyOptions, Operation, PatchError};

/// Apply every operation in order, collecting one result per operation.
///
/// A failed operation does not stop the ones after it.
pub fn apply_patch(object: &mut Value, patch: &[Operation]) -> Vec<Result<(), PatchError>> {
    patch
        .iter()
        .enumerate()
        .map(|(index, operation)| {
            let result = apply(object, operation);
            if let Err(error) = &result {
                debug!(index, op = operation.op_name(), path = %operation.path(), %error, "patch operation failed");
            }
            result
        })
        .collect()
}

/// [`apply_patch`] with options.
///
/// With `atomic` set, the document is only changed when every operation
/// succeeds.
pub fn apply_patch_with(
    object: &mut Value,
    patch: &[Operation],
    options: &ApplyOptions,
) -> Vec<Result<(), PatchError>> {
    if !options.atomic {
        return apply_patch(object, patch);
    }
    let mut working = object.clone();
    let results = apply_patch(&mut working, patch);
    if results.iter().all(Result::is_ok) {
        *object = working;
    } else {
        debug!(operations = patch.len(), "atomic patch rolled back");
    }
    results
}

/// Apply a patch given as raw JSON operations.
///
/// Entries that are not one of the six operations yield
/// [`PatchError::InvalidOperation`]; with `atomic` set they also keep the
/// document unchanged.
///
/// # Errors
///
/// A malformed pointer anywhere in the patch is returned before any
/// operation is applied.
pub fn apply_json_patch(
    object: &mut Value,
    patch: &[Value],
    options: &ApplyOptions,
) -> Result<Vec<Result<(), PatchError>>, PointerError> {
    let decoded = codec::from_json_patch(patch)?;

    let known: Vec<Operation> = decoded.iter().flatten().cloned().collect();
    let has_invalid = known.len() < decoded.len();
    let mut known_results = if options.atomic && has_invalid {
        // An invalid entry fails the batch; run on a copy only to report results.
        apply_patch(&mut object.clone(), &known)
    } else {
        apply_patch_with(object, &known, options)
    }
    .into_iter();

    Ok(decoded
        .iter()
        .zip(patch)
        .map(|(operation, raw)| match operation {
            Some(_) => known_results.next().unwrap_or(Ok(())),
            None => Err(PatchError::InvalidOperation(raw.clone())),
        })
        .collect())
}

/// Compute the operations that turn `input` into `output`.
pub fn create_patch(input: &Value, output: &Value) -> Vec<Operation> {
    default_diff(input, output, &Pointer::root())
}

/// [`create_patch`] with a custom diff tried first at every level.
///
/// Returning `None` from `custom` falls back to the default behavior for
/// that pair of values, which still recurses through `custom`.
///
/// ```
/// use rfc6902::{create_patch_with, Operation};
/// use serde_json::json;
///
/// // Treat any two strings as equal.
/// let patch = create_patch_with(&json!({"a": "x", "b": 1}), &json!({"a": "y", "b": 2}), |i, o, _| {
///     (i.is_string() && o.is_string()).then(Vec::new)
/// });
/// assert_eq!(patch.len(), 1);
/// assert_eq!(patch[0].path().to_string(), "/b");
/// ```
pub fn create_patch_with<F>(input: &Value, output: &Value, custom: F) -> Vec<Operation>
where
    F: Fn(&Value, &Value, &Pointer) -> Option<Vec<Operation>>,
{
    WrappedDiff(custom).diff(input, output, &Pointer::root())
}

struct WrappedDiff<F>(F);

impl<F> WrappedDiff<F>
where
    F: Fn(&Value, &Value, &Pointer) -> Option<Vec<Operation>>,
{
    fn diff(&self, input: &Value, output: &Value, ptr: &Pointer) -> Vec<Operation> {
        match (self.0)(input, output, ptr) {
            Some(ops) => ops,
            None => diff_any(input, output, ptr, &|i: &Value, o: &Value, p: &Pointer| {
                self.diff(i, o, p)
            }),
        }
    }
}

/// Build `test` operations that pin, in `input`, every location a
/// destructive operation of `patch` reads or overwrites.
///
/// Applying the result to a document before `patch` detects that it changed
/// since the patch was computed. Locations that do not resolve in `input`
/// are skipped.
pub fn create_tests(input: &Value, patch: &[Operation]) -> Vec<Operation> {
    let create_test = |path: &Pointer| {
        path.get(input).map(|value| Operation::Test {
            path: path.clone(),
            value: value.clone(),
        })
    };
    patch
        .iter()
        .filter(|operation| operation.is_destructive())
        .flat_map(|operation| {
            let path_test = create_test(operation.path());
            let from_test = operation.from().and_then(create_test);
            path_test.into_iter().chain(from_test)
        })
        .collect()
}
