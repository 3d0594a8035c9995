//! Core types: the operation enum, per-operation errors, and apply options.

use rfc6902_pointer::Pointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Failure of a single patch operation. Returned as a value, never panics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("Value required at path: {path}")]
    Missing { path: String },
    #[error("Test failed: {} != {expected}", describe(.actual))]
    Test {
        actual: Option<Value>,
        expected: Value,
    },
    #[error("Invalid operation: {}", op_of(.0))]
    InvalidOperation(Value),
}

impl PatchError {
    pub fn missing(path: &Pointer) -> Self {
        PatchError::Missing {
            path: path.to_string(),
        }
    }
}

fn describe(value: &Option<Value>) -> String {
    value
        .as_ref()
        .map_or_else(|| "undefined".to_string(), Value::to_string)
}

fn op_of(operation: &Value) -> String {
    operation
        .get("op")
        .map_or_else(|| "undefined".to_string(), Value::to_string)
}

// ── Operation enum ────────────────────────────────────────────────────────

/// A JSON Patch operation with the RFC 6902 wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Add { path: Pointer, value: Value },
    Remove { path: Pointer },
    Replace { path: Pointer, value: Value },
    Move { from: Pointer, path: Pointer },
    Copy { from: Pointer, path: Pointer },
    Test { path: Pointer, value: Value },
}

impl Operation {
    /// The `op` discriminator as it appears on the wire.
    pub fn op_name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Remove { .. } => "remove",
            Operation::Replace { .. } => "replace",
            Operation::Move { .. } => "move",
            Operation::Copy { .. } => "copy",
            Operation::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &Pointer {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    /// The source location of `move` and `copy`.
    pub fn from(&self) -> Option<&Pointer> {
        match self {
            Operation::Move { from, .. } | Operation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// True for operations that overwrite or remove existing data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Operation::Remove { .. }
                | Operation::Replace { .. }
                | Operation::Copy { .. }
                | Operation::Move { .. }
        )
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`crate::apply_patch_with`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Apply to a copy and keep the result only if every operation succeeded.
    pub atomic: bool,
}
