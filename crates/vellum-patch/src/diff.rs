//! Structural diffing between two value trees.
//!
//! Deterministic, apply-clean patch lists: applying `diff(base, next)`
//! to `base` yields `next`. Pointer-shared subtrees short-circuit, so
//! diffing two states of one produce chain costs only the edited
//! spines.

use crate::apply::PatchError;
use crate::patch::Patch;
use vellum_kernel::{Draft, Path, Value, produce};

/// Compute the patch list turning `base` into `next`.
///
/// Maps diff key-by-key in sorted order, removals before adds and
/// recursions. Lists diff index-by-index over the common prefix, then
/// append or remove the tail (removals in descending index order so
/// they apply cleanly). Anything else that differs becomes a single
/// `replace` of the whole subtree.
pub fn diff(base: &Value, next: &Value) -> Vec<Patch> {
    let mut patches = Vec::new();
    let mut at = Path::root();
    diff_at(base, next, &mut at, &mut patches);
    patches
}

fn diff_at(base: &Value, next: &Value, at: &mut Path, out: &mut Vec<Patch>) {
    if base == next {
        return;
    }
    match (base, next) {
        (Value::Map(a), Value::Map(b)) => {
            for key in a.keys() {
                if !b.contains_key(key) {
                    out.push(Patch::Remove {
                        path: at.clone().key(key.clone()),
                    });
                }
            }
            for (key, next_child) in b.iter() {
                match a.get(key) {
                    Some(base_child) => {
                        at.push(vellum_kernel::Step::Key(key.clone()));
                        diff_at(base_child, next_child, at, out);
                        at.pop();
                    }
                    None => out.push(Patch::Add {
                        path: at.clone().key(key.clone()),
                        value: next_child.clone(),
                    }),
                }
            }
        }
        (Value::List(a), Value::List(b)) => {
            let common = a.len().min(b.len());
            for index in 0..common {
                at.push(vellum_kernel::Step::Index(index));
                diff_at(&a[index], &b[index], at, out);
                at.pop();
            }
            for index in common..b.len() {
                out.push(Patch::Add {
                    path: at.clone().index(index),
                    value: b[index].clone(),
                });
            }
            for index in (common..a.len()).rev() {
                out.push(Patch::Remove {
                    path: at.clone().index(index),
                });
            }
        }
        _ => out.push(Patch::Replace {
            path: at.clone(),
            value: next.clone(),
        }),
    }
}

/// Produce with patch tracking: the new value, the forward patches
/// (base → result), and the inverse patches (result → base).
pub fn produce_with_patches<F>(base: &Value, recipe: F) -> (Value, Vec<Patch>, Vec<Patch>)
where
    F: FnOnce(&mut Draft),
{
    let next = produce(base, recipe);
    let forward = diff(base, &next);
    let inverse = diff(&next, base);
    (next, forward, inverse)
}

/// Round-trip invariant helper used by callers that persist patches:
/// forward patches must reproduce `next` from `base` exactly.
pub fn verify_patches(base: &Value, next: &Value, patches: &[Patch]) -> Result<bool, PatchError> {
    let patched = crate::apply::apply(base, patches)?;
    Ok(patched == *next)
}
