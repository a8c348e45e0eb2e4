//! Patch application.
//!
//! All patches in one call run inside a single produce, so the result
//! structurally shares with the base exactly like a hand-written
//! recipe would. Application is transactional: any failing patch
//! discards the whole draft.

use crate::patch::Patch;
use serde::Serialize;
use vellum_kernel::{Draft, DraftError, Path, Value, ValueKind, try_produce};

/// A patch that could not be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("cannot apply patch {index} ({op} at {path}): {source}")]
pub struct PatchError {
    /// Position of the failing patch in the input slice.
    pub index: usize,
    pub op: &'static str,
    pub path: Path,
    #[source]
    pub source: DraftError,
}

/// Apply `patches` to `base` in order, producing the patched value.
pub fn apply(base: &Value, patches: &[Patch]) -> Result<Value, PatchError> {
    let mut at = 0usize;
    let result = try_produce(base, |draft| {
        for (index, patch) in patches.iter().enumerate() {
            at = index;
            apply_one(draft, patch)?;
        }
        Ok(())
    });
    result.map_err(|source| PatchError {
        index: at,
        op: patches[at].op(),
        path: patches[at].path().clone(),
        source,
    })
}

fn apply_one(draft: &mut Draft, patch: &Patch) -> Result<(), DraftError> {
    match patch {
        Patch::Add { path, value } => match path.split_last() {
            None => {
                draft.replace(value.clone());
                Ok(())
            }
            // An index-shaped final step only means list insert when the
            // parent really is a list; pointer text cannot distinguish a
            // numeric map key from an index.
            Some((_, step)) if step.as_index().is_some() => {
                let parent = path.parent().unwrap_or_else(Path::root);
                match draft.kind_at(&parent) {
                    Some(ValueKind::List) => draft.insert(path, value.clone()),
                    _ => draft.set(path, value.clone()),
                }
            }
            Some(_) => draft.set(path, value.clone()),
        },
        Patch::Replace { path, value } => {
            // Replace requires the target to exist; set alone would
            // silently upsert a missing map key.
            if !path.is_root() && draft.get(path).is_none() {
                return Err(DraftError::PathNotFound { path: path.clone() });
            }
            draft.set(path, value.clone())
        }
        Patch::Remove { path } => draft.remove(path).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(json: &str) -> Value {
        let raw: serde_json::Value = serde_json::from_str(json).unwrap();
        Value::from(raw)
    }

    fn patches(json: &str) -> Vec<Patch> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn applies_in_order() {
        let base = state(r#"{"todos": [{"done": false}]}"#);
        let next = apply(
            &base,
            &patches(
                r#"[
                    {"op": "replace", "path": "/todos/0/done", "value": true},
                    {"op": "add", "path": "/todos/1", "value": {"done": false}},
                    {"op": "add", "path": "/owner", "value": "ada"}
                ]"#,
            ),
        )
        .unwrap();
        assert_eq!(
            next,
            state(r#"{"todos": [{"done": true}, {"done": false}], "owner": "ada"}"#)
        );
        // Base untouched.
        assert_eq!(base.get("todos").unwrap().as_list().unwrap().len(), 1);
    }

    #[test]
    fn empty_patch_list_is_a_no_op() {
        let base = state(r#"{"done": false}"#);
        let next = apply(&base, &[]).unwrap();
        assert!(base.ptr_eq(&next));
    }

    #[test]
    fn replace_of_missing_member_fails() {
        let base = state(r#"{"done": false}"#);
        let err = apply(
            &base,
            &patches(r#"[{"op": "replace", "path": "/missing", "value": 1}]"#),
        )
        .unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.op, "replace");
        assert!(matches!(err.source, DraftError::PathNotFound { .. }));
    }

    #[test]
    fn failure_reports_the_failing_index() {
        let base = state(r#"{"a": 1}"#);
        let err = apply(
            &base,
            &patches(
                r#"[
                    {"op": "replace", "path": "/a", "value": 2},
                    {"op": "remove", "path": "/b"}
                ]"#,
            ),
        )
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.op, "remove");
    }

    #[test]
    fn root_add_replaces_the_document() {
        let base = state(r#"{"a": 1}"#);
        let next = apply(&base, &patches(r#"[{"op": "add", "path": "", "value": [1]}]"#)).unwrap();
        assert_eq!(next, state("[1]"));
    }

    #[test]
    fn add_with_numeric_map_key_stays_a_map_upsert() {
        let base = state(r#"{"by_id": {"1": "a"}}"#);
        let next = apply(
            &base,
            &patches(r#"[{"op": "add", "path": "/by_id/2", "value": "b"}]"#),
        )
        .unwrap();
        assert_eq!(next, state(r#"{"by_id": {"1": "a", "2": "b"}}"#));
    }

    #[test]
    fn add_at_list_end_appends() {
        let base = state(r#"{"xs": [1, 2]}"#);
        let next = apply(
            &base,
            &patches(r#"[{"op": "add", "path": "/xs/2", "value": 3}]"#),
        )
        .unwrap();
        assert_eq!(next, state(r#"{"xs": [1, 2, 3]}"#));
    }
}
