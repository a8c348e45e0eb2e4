//! Integration tests: undo/redo built from inverse patches.
//!
//! The canonical consumer of `produce_with_patches`: keep the forward
//! patches as a redo stack and the inverse patches as an undo stack,
//! and walk the document history in both directions.

use vellum_kernel::{Value, produce};
use vellum_patch::{Patch, apply, diff, produce_with_patches};

fn state(json: &str) -> Value {
    let raw: serde_json::Value = serde_json::from_str(json).unwrap();
    Value::from(raw)
}

struct History {
    current: Value,
    undo: Vec<Vec<Patch>>,
    redo: Vec<Vec<Patch>>,
}

impl History {
    fn new(initial: Value) -> Self {
        History {
            current: initial,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    fn edit(&mut self, recipe: impl FnOnce(&mut vellum_kernel::Draft)) {
        let (next, _, inverse) = produce_with_patches(&self.current, recipe);
        if inverse.is_empty() {
            return;
        }
        self.undo.push(inverse);
        self.redo.clear();
        self.current = next;
    }

    fn undo(&mut self) {
        if let Some(inverse) = self.undo.pop() {
            let prev = apply(&self.current, &inverse).expect("inverse patches apply");
            self.redo.push(diff(&prev, &self.current));
            self.current = prev;
        }
    }

    fn redo(&mut self) {
        if let Some(forward) = self.redo.pop() {
            let next = apply(&self.current, &forward).expect("forward patches apply");
            self.undo.push(diff(&next, &self.current));
            self.current = next;
        }
    }
}

#[test]
fn undo_then_redo_walks_the_same_states() {
    let s0 = state(r#"{"title": "draft", "tags": []}"#);
    let mut history = History::new(s0.clone());

    history.edit(|d| {
        d.set(&"/title".parse().unwrap(), "final").unwrap();
    });
    let s1 = history.current.clone();
    history.edit(|d| {
        d.push(&"/tags".parse().unwrap(), "reviewed").unwrap();
    });
    let s2 = history.current.clone();

    history.undo();
    assert_eq!(history.current, s1);
    history.undo();
    assert_eq!(history.current, s0);
    history.redo();
    assert_eq!(history.current, s1);
    history.redo();
    assert_eq!(history.current, s2);
}

#[test]
fn no_op_edits_do_not_pollute_history() {
    let s0 = state(r#"{"title": "draft"}"#);
    let mut history = History::new(s0.clone());
    history.edit(|_| {});
    history.edit(|d| {
        d.set(&"/title".parse().unwrap(), "draft").unwrap();
    });
    assert!(history.undo.is_empty());
    assert_eq!(history.current, s0);
}

#[test]
fn inverse_patches_restore_structural_sharing_targets() {
    let base = state(r#"{"doc": {"body": "text"}, "meta": {"rev": 1}}"#);
    let next = produce(&base, |d| {
        d.set(&"/meta/rev".parse().unwrap(), 2i64).unwrap();
    });

    let inverse = diff(&next, &base);
    let restored = apply(&next, &inverse).unwrap();
    assert_eq!(restored, base);
    // The untouched doc subtree rode through both transitions shared.
    assert!(base.get("doc").unwrap().ptr_eq(next.get("doc").unwrap()));
    assert!(next.get("doc").unwrap().ptr_eq(restored.get("doc").unwrap()));
}
