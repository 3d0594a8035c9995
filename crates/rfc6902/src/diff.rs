//! Diff engine: the operations that turn one JSON value into another.
//!
//! Objects are diffed key by key, arrays with a Levenshtein-style dynamic
//! program over insert / remove / replace, everything else is replaced
//! wholesale.

use rfc6902_pointer::{Pointer, APPEND_TOKEN};
use serde_json::{Map, Value};
use tracing::trace;

use crate::types::Operation;
use crate::util::is_identical_scalar;

/// A diff function. [`diff_any`] takes one as its recursion hook so callers
/// can intercept any subtree.
pub type Diff<'a> = dyn Fn(&Value, &Value, &Pointer) -> Vec<Operation> + 'a;

/// [`diff_any`] recursing into itself.
pub fn default_diff(input: &Value, output: &Value, ptr: &Pointer) -> Vec<Operation> {
    diff_any(input, output, ptr, &default_diff)
}

/// Diff two values of any shape, delegating nested values to `diff`.
pub fn diff_any(input: &Value, output: &Value, ptr: &Pointer, diff: &Diff<'_>) -> Vec<Operation> {
    if is_identical_scalar(input, output) {
        return Vec::new();
    }
    match (input, output) {
        (Value::Array(i), Value::Array(o)) => diff_arrays(i, o, ptr, diff),
        (Value::Object(i), Value::Object(o)) => diff_objects(i, o, ptr, diff),
        _ => vec![Operation::Replace {
            path: ptr.clone(),
            value: output.clone(),
        }],
    }
}

/// Removes for input-only keys, adds for output-only keys, then the diffs of
/// shared keys, each group in enumeration order.
pub fn diff_objects(
    input: &Map<String, Value>,
    output: &Map<String, Value>,
    ptr: &Pointer,
    diff: &Diff<'_>,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    for key in input.keys().filter(|key| !output.contains_key(*key)) {
        ops.push(Operation::Remove { path: ptr.add(key) });
    }
    for (key, value) in output.iter().filter(|(key, _)| !input.contains_key(*key)) {
        ops.push(Operation::Add {
            path: ptr.add(key),
            value: value.clone(),
        });
    }
    for (key, left) in input {
        if let Some(right) = output.get(key) {
            ops.extend(diff(left, right, &ptr.add(key)));
        }
    }
    ops
}

// ── Array diff ────────────────────────────────────────────────────────────

/// An edit on the array being diffed, in table coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayOperation {
    /// Insert `output[value]` after the first `after` input elements.
    Add { after: usize, value: usize },
    /// Remove `input[index]`.
    Remove { index: usize },
    /// Turn `input[index]` into `output[value]`.
    Replace { index: usize, value: usize },
}

/// One cell of the edit-distance table.
#[derive(Debug, Clone, Copy)]
struct Alternative {
    prev: Option<(usize, usize)>,
    operation: Option<ArrayOperation>,
    cost: usize,
}

impl Alternative {
    const START: Alternative = Alternative {
        prev: None,
        operation: None,
        cost: 0,
    };

    fn after(base: &Alternative, prev: (usize, usize), operation: ArrayOperation) -> Self {
        Alternative {
            prev: Some(prev),
            operation: Some(operation),
            cost: base.cost + 1,
        }
    }
}

/// Diff two arrays into a minimal sequence of adds, removes and nested diffs.
///
/// On equal cost the preference is remove, then add, then replace. Paths are
/// expressed against the array as it looks when each operation is applied
/// in order.
pub fn diff_arrays(input: &[Value], output: &[Value], ptr: &Pointer, diff: &Diff<'_>) -> Vec<Operation> {
    let same = |index: usize, b: &Value| diff(&input[index], b, &ptr.add(index)).is_empty();

    let mut input_end = input.len();
    let mut output_end = output.len();
    while input_end > 0 && output_end > 0 && same(input_end - 1, &output[output_end - 1]) {
        input_end -= 1;
        output_end -= 1;
    }
    trace!(
        path = %ptr,
        input_len = input.len(),
        output_len = output.len(),
        input_end,
        output_end,
        "diffing arrays"
    );

    let mut memo: Vec<Vec<Alternative>> = Vec::with_capacity(input_end + 1);
    for i in 0..=input_end {
        let mut row: Vec<Alternative> = Vec::with_capacity(output_end + 1);
        for j in 0..=output_end {
            let cell = if i == 0 && j == 0 {
                Alternative::START
            } else if j == 0 {
                Alternative::after(&memo[i - 1][j], (i - 1, j), ArrayOperation::Remove { index: i - 1 })
            } else if i == 0 {
                Alternative::after(&row[j - 1], (i, j - 1), ArrayOperation::Add { after: i, value: j - 1 })
            } else if same(i - 1, &output[j - 1]) {
                memo[i - 1][j - 1]
            } else {
                let remove = &memo[i - 1][j];
                let add = &row[j - 1];
                let replace = &memo[i - 1][j - 1];
                let min_cost = remove.cost.min(add.cost).min(replace.cost);
                if remove.cost == min_cost {
                    Alternative::after(remove, (i - 1, j), ArrayOperation::Remove { index: i - 1 })
                } else if add.cost == min_cost {
                    Alternative::after(add, (i, j - 1), ArrayOperation::Add { after: i, value: j - 1 })
                } else {
                    Alternative::after(
                        replace,
                        (i - 1, j - 1),
                        ArrayOperation::Replace { index: i - 1, value: j - 1 },
                    )
                }
            };
            row.push(cell);
        }
        memo.push(row);
    }

    let mut array_operations = Vec::new();
    let mut cursor = memo[input_end][output_end];
    while let (Some((pi, pj)), Some(operation)) = (cursor.prev, cursor.operation) {
        array_operations.push(operation);
        cursor = memo[pi][pj];
    }
    array_operations.reverse();

    let input_length = input.len() as isize;
    let mut padding: isize = 0;
    let mut ops = Vec::with_capacity(array_operations.len());
    for operation in array_operations {
        match operation {
            ArrayOperation::Add { after, value } => {
                let padded_index = after as isize + padding;
                let token = if padded_index < input_length + padding {
                    padded_index.to_string()
                } else {
                    APPEND_TOKEN.to_string()
                };
                ops.push(Operation::Add {
                    path: ptr.add(token),
                    value: output[value].clone(),
                });
                padding += 1;
            }
            ArrayOperation::Remove { index } => {
                ops.push(Operation::Remove {
                    path: ptr.add(index as isize + padding),
                });
                padding -= 1;
            }
            ArrayOperation::Replace { index, value } => {
                let replace_ptr = ptr.add(index as isize + padding);
                ops.extend(diff(&input[index], &output[value], &replace_ptr));
            }
        }
    }
    ops
}
