//! Core logic behind the `json-patch` and `json-diff` binaries.
//!
//! - `json-patch` applies a patch to a document read from stdin
//! - `json-diff` prints the patch between two documents

use rfc6902_pointer::PointerError;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::codec::to_json_patch;
use crate::{apply_json_patch, create_patch, create_tests, ApplyOptions};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Pointer(#[from] PointerError),
    #[error("{0}")]
    Usage(String),
}

/// Install a stderr subscriber filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

// ── json-patch ────────────────────────────────────────────────────────────

/// Result of applying a patch from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    /// The document after the patch, serialized.
    pub document: String,
    /// `[index] message` for every failed operation.
    pub failures: Vec<String>,
}

/// Apply a JSON patch string to a JSON document string.
pub fn apply_patch_str(doc: &str, patch: &str, options: &ApplyOptions) -> Result<PatchOutcome, CliError> {
    let mut doc: Value = serde_json::from_str(doc)?;
    let patch: Value = serde_json::from_str(patch)?;
    let ops = patch
        .as_array()
        .ok_or_else(|| CliError::Usage("First argument must be a JSON patch array.".to_string()))?;

    let failures = apply_json_patch(&mut doc, ops, options)?
        .iter()
        .enumerate()
        .filter_map(|(index, result)| result.as_ref().err().map(|e| format!("[{index}] {e}")))
        .collect();

    Ok(PatchOutcome {
        document: serde_json::to_string(&doc)?,
        failures,
    })
}

// ── json-diff ─────────────────────────────────────────────────────────────

/// Diff two JSON document strings into a patch string.
///
/// With `guarded`, the patch is preceded by `test` operations pinning the
/// state it was computed from.
pub fn diff_str(input: &str, output: &str, guarded: bool) -> Result<String, CliError> {
    let input: Value = serde_json::from_str(input)?;
    let output: Value = serde_json::from_str(output)?;
    let patch = create_patch(&input, &output);
    let ops = if guarded {
        let mut ops = create_tests(&input, &patch);
        ops.extend(patch);
        ops
    } else {
        patch
    };
    Ok(serde_json::to_string(&to_json_patch(&ops))?)
}
