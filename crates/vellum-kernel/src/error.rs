//! Error types for draft operations.

use crate::path::Path;
use crate::value::ValueKind;
use serde::Serialize;

/// Errors arising from path-addressed edits on a draft.
///
/// Every variant carries the path at which resolution stopped, in
/// pointer text form when serialized.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum DraftError {
    /// The path names a member that does not exist.
    #[error("path not found: {path}")]
    PathNotFound { path: Path },

    /// Traversal or an operation met a value of the wrong shape.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: Path,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A list index beyond the end of the list.
    #[error("index {index} out of bounds at {path} (len {len})")]
    IndexOutOfBounds {
        path: Path,
        index: usize,
        len: usize,
    },

    /// A list operation whose final step is a map key.
    #[error("list operation at {path} requires an index step")]
    IndexStepExpected { path: Path },

    /// An operation that needs a non-root path was given the root.
    #[error("{op} requires a non-root path")]
    RootPath { op: &'static str },
}
