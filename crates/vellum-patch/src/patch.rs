//! The patch wire type.
//!
//! One patch is one path-addressed edit. The wire form is
//! JSON-Patch-flavored: `{"op": "replace", "path": "/todos/0/done",
//! "value": true}`.

use serde::{Deserialize, Serialize};
use vellum_kernel::{Path, Value};

/// A single path-addressed edit to a value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Patch {
    /// Insert a new member: a fresh map key, or a list slot at the
    /// index named by the final step (index == len appends).
    Add { path: Path, value: Value },
    /// Overwrite an existing member (or the root).
    Replace { path: Path, value: Value },
    /// Remove an existing member.
    Remove { path: Path },
}

impl Patch {
    pub fn path(&self) -> &Path {
        match self {
            Patch::Add { path, .. } => path,
            Patch::Replace { path, .. } => path,
            Patch::Remove { path } => path,
        }
    }

    /// The wire name of this patch's operation.
    pub fn op(&self) -> &'static str {
        match self {
            Patch::Add { .. } => "add",
            Patch::Replace { .. } => "replace",
            Patch::Remove { .. } => "remove",
        }
    }
}
