//! Copy-on-write drafts: the writable view inside a produce call.
//!
//! A draft shadows the base value with a sparse edit tree. Every node
//! starts as a shared reference to the corresponding base subtree; the
//! first write along a path shallow-copies just that path's spine, so
//! sibling subtrees stay pointer-shared with the base all the way to
//! finish. Writing a value equal to what is already present is a no-op
//! and does not mark the draft modified.
//!
//! Error convention: `PathNotFound` carries the path of the missing
//! member; `TypeMismatch` and `IndexOutOfBounds` carry the path of the
//! container that rejected the step.

use crate::error::DraftError;
use crate::path::{Path, Step};
use crate::value::{Value, ValueKind};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shadow tree: untouched subtrees stay `Val` (sharing the base),
/// touched spines become `Map`/`List` of child nodes.
enum Node {
    Val(Value),
    Map(BTreeMap<String, Node>),
    List(Vec<Node>),
}

/// The mutable view of a base value for the duration of one produce.
///
/// All edits are path-addressed and fallible; the draft stays in its
/// pre-edit state when an operation errors partway.
pub struct Draft {
    base: Value,
    root: Node,
    modified: bool,
}

impl Draft {
    pub(crate) fn new(base: Value) -> Self {
        let root = Node::Val(base.clone());
        Draft {
            base,
            root,
            modified: false,
        }
    }

    /// The untouched base value this draft was opened over.
    pub fn original(&self) -> &Value {
        &self.base
    }

    /// Whether any effective edit has been applied.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Materialize the current draft state without finishing it.
    pub fn snapshot(&self) -> Value {
        if !self.modified {
            return self.base.clone();
        }
        materialize(&self.root)
    }

    /// The current value at `path`, seeing all prior edits.
    pub fn get(&self, path: &Path) -> Option<Value> {
        self.read_at(path).ok()
    }

    /// The shape of the current value at `path`, without materializing
    /// it. `None` when the path does not resolve.
    pub fn kind_at(&self, path: &Path) -> Option<ValueKind> {
        node_kind(&self.root, path, 0)
    }

    /// Write `value` at `path`.
    ///
    /// Overwrites an existing map key or list slot; a missing final map
    /// key is inserted. Writing an equal value is a no-op. The root path
    /// replaces the whole state.
    pub fn set(&mut self, path: &Path, value: impl Into<Value>) -> Result<(), DraftError> {
        let value = value.into();
        let Some((_, last)) = path.split_last() else {
            self.replace(value);
            return Ok(());
        };

        match self.read_at(path) {
            Ok(existing) => {
                if existing == value {
                    return Ok(());
                }
            }
            // A missing final map key means insert; anything shallower
            // (or any other failure) is a real error.
            Err(DraftError::PathNotFound { path: missing }) if missing == *path => {}
            Err(e) => return Err(e),
        }

        let parent_depth = path.len() - 1;
        let parent = descend_mut(&mut self.root, path, parent_depth)?;
        match parent {
            Node::Map(children) => {
                children.insert(last.as_key(), Node::Val(value));
            }
            Node::List(items) => {
                let index = last.as_index().ok_or_else(|| DraftError::TypeMismatch {
                    path: path.truncated(parent_depth),
                    expected: ValueKind::Map,
                    found: ValueKind::List,
                })?;
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or_else(|| DraftError::IndexOutOfBounds {
                        path: path.truncated(parent_depth),
                        index,
                        len,
                    })?;
                *slot = Node::Val(value);
            }
            Node::Val(v) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(parent_depth),
                    expected: expected_container(last),
                    found: v.kind(),
                });
            }
        }
        self.modified = true;
        Ok(())
    }

    /// Remove the member at `path`, returning its value.
    pub fn remove(&mut self, path: &Path) -> Result<Value, DraftError> {
        let Some((_, last)) = path.split_last() else {
            return Err(DraftError::RootPath { op: "remove" });
        };
        let removed = self.read_at(path)?;

        let parent_depth = path.len() - 1;
        let parent = descend_mut(&mut self.root, path, parent_depth)?;
        match parent {
            Node::Map(children) => {
                children.remove(&last.as_key());
            }
            Node::List(items) => {
                let index = last.as_index().ok_or_else(|| DraftError::IndexStepExpected {
                    path: path.clone(),
                })?;
                if index >= items.len() {
                    return Err(DraftError::IndexOutOfBounds {
                        path: path.truncated(parent_depth),
                        index,
                        len: items.len(),
                    });
                }
                items.remove(index);
            }
            Node::Val(v) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(parent_depth),
                    expected: expected_container(last),
                    found: v.kind(),
                });
            }
        }
        self.modified = true;
        Ok(removed)
    }

    /// Insert `value` into the list enclosing `path` at the index named
    /// by the final step. Index equal to the length appends.
    pub fn insert(&mut self, path: &Path, value: impl Into<Value>) -> Result<(), DraftError> {
        let value = value.into();
        let Some((_, last)) = path.split_last() else {
            return Err(DraftError::RootPath { op: "insert" });
        };
        let index = last.as_index().ok_or_else(|| DraftError::IndexStepExpected {
            path: path.clone(),
        })?;

        let parent_depth = path.len() - 1;
        let parent = descend_mut(&mut self.root, path, parent_depth)?;
        match parent {
            Node::List(items) => {
                if index > items.len() {
                    return Err(DraftError::IndexOutOfBounds {
                        path: path.truncated(parent_depth),
                        index,
                        len: items.len(),
                    });
                }
                items.insert(index, Node::Val(value));
            }
            Node::Map(_) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(parent_depth),
                    expected: ValueKind::List,
                    found: ValueKind::Map,
                });
            }
            Node::Val(v) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(parent_depth),
                    expected: ValueKind::List,
                    found: v.kind(),
                });
            }
        }
        self.modified = true;
        Ok(())
    }

    /// Append `value` to the list at `path`.
    pub fn push(&mut self, path: &Path, value: impl Into<Value>) -> Result<(), DraftError> {
        let value = value.into();
        let node = descend_mut(&mut self.root, path, path.len())?;
        match node {
            Node::List(items) => items.push(Node::Val(value)),
            Node::Map(_) => {
                return Err(DraftError::TypeMismatch {
                    path: path.clone(),
                    expected: ValueKind::List,
                    found: ValueKind::Map,
                });
            }
            Node::Val(v) => {
                return Err(DraftError::TypeMismatch {
                    path: path.clone(),
                    expected: ValueKind::List,
                    found: v.kind(),
                });
            }
        }
        self.modified = true;
        Ok(())
    }

    /// Replace the entire draft state — the "recipe returns a brand-new
    /// value" form. Replacing with an equal value is a no-op.
    pub fn replace(&mut self, value: impl Into<Value>) {
        let value = value.into();
        if !self.modified && self.base == value {
            return;
        }
        if self.modified && materialize(&self.root) == value {
            return;
        }
        self.root = Node::Val(value);
        self.modified = true;
    }

    pub(crate) fn finish(self) -> Value {
        if !self.modified {
            return self.base;
        }
        finalize(self.root)
    }

    fn read_at(&self, path: &Path) -> Result<Value, DraftError> {
        read(&self.root, path, 0)
    }
}

fn expected_container(step: &Step) -> ValueKind {
    match step {
        Step::Key(_) => ValueKind::Map,
        Step::Index(_) => ValueKind::List,
    }
}

/// Materialize a shadow node into a plain value, without consuming it.
fn materialize(node: &Node) -> Value {
    match node {
        Node::Val(v) => v.clone(),
        Node::Map(children) => Value::Map(Arc::new(
            children
                .iter()
                .map(|(k, n)| (k.clone(), materialize(n)))
                .collect(),
        )),
        Node::List(items) => Value::List(Arc::new(items.iter().map(materialize).collect())),
    }
}

/// Consume the shadow tree into the final value. Untouched (`Val`)
/// subtrees pass through with their allocations intact.
fn finalize(node: Node) -> Value {
    match node {
        Node::Val(v) => v,
        Node::Map(children) => Value::Map(Arc::new(
            children
                .into_iter()
                .map(|(k, n)| (k, finalize(n)))
                .collect(),
        )),
        Node::List(items) => Value::List(Arc::new(items.into_iter().map(finalize).collect())),
    }
}

fn node_kind(node: &Node, path: &Path, depth: usize) -> Option<ValueKind> {
    match node {
        Node::Val(v) => {
            let mut cur = v;
            for step in &path.steps()[depth..] {
                cur = match (cur, step) {
                    (Value::Map(entries), _) => entries.get(&step.as_key())?,
                    (Value::List(items), Step::Index(i)) => items.get(*i)?,
                    _ => return None,
                };
            }
            Some(cur.kind())
        }
        Node::Map(children) => match path.steps().get(depth) {
            None => Some(ValueKind::Map),
            Some(step) => node_kind(children.get(&step.as_key())?, path, depth + 1),
        },
        Node::List(items) => match path.steps().get(depth) {
            None => Some(ValueKind::List),
            Some(step) => node_kind(items.get(step.as_index()?)?, path, depth + 1),
        },
    }
}

/// Read the current value at `path`, crossing from shadow nodes into
/// untouched base subtrees as needed.
fn read(node: &Node, path: &Path, depth: usize) -> Result<Value, DraftError> {
    match node {
        Node::Val(v) => value_at(v, path, depth),
        Node::Map(children) => {
            let Some(step) = path.steps().get(depth) else {
                return Ok(materialize(node));
            };
            match children.get(&step.as_key()) {
                Some(child) => read(child, path, depth + 1),
                None => Err(DraftError::PathNotFound {
                    path: path.truncated(depth + 1),
                }),
            }
        }
        Node::List(items) => {
            let Some(step) = path.steps().get(depth) else {
                return Ok(materialize(node));
            };
            let index = step.as_index().ok_or_else(|| DraftError::TypeMismatch {
                path: path.truncated(depth),
                expected: ValueKind::Map,
                found: ValueKind::List,
            })?;
            match items.get(index) {
                Some(child) => read(child, path, depth + 1),
                None => Err(DraftError::IndexOutOfBounds {
                    path: path.truncated(depth),
                    index,
                    len: items.len(),
                }),
            }
        }
    }
}

/// Resolve the tail of `path` inside an untouched value subtree.
fn value_at(value: &Value, path: &Path, depth: usize) -> Result<Value, DraftError> {
    let mut cur = value;
    for (offset, step) in path.steps()[depth..].iter().enumerate() {
        let here = depth + offset;
        cur = match (cur, step) {
            (Value::Map(entries), _) => {
                entries
                    .get(&step.as_key())
                    .ok_or_else(|| DraftError::PathNotFound {
                        path: path.truncated(here + 1),
                    })?
            }
            (Value::List(items), Step::Index(index)) => {
                items
                    .get(*index)
                    .ok_or_else(|| DraftError::IndexOutOfBounds {
                        path: path.truncated(here),
                        index: *index,
                        len: items.len(),
                    })?
            }
            (Value::List(_), Step::Key(_)) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(here),
                    expected: ValueKind::Map,
                    found: ValueKind::List,
                });
            }
            (other, _) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(here),
                    expected: expected_container(step),
                    found: other.kind(),
                });
            }
        };
    }
    Ok(cur.clone())
}

/// Walk mutably to the node at the first `upto` steps of `path`,
/// thawing the spine: each traversed `Val` composite becomes a shadow
/// map/list whose children still share the base. The destination node
/// itself is thawed too.
fn descend_mut<'a>(
    mut node: &'a mut Node,
    path: &Path,
    upto: usize,
) -> Result<&'a mut Node, DraftError> {
    for (i, step) in path.steps()[..upto].iter().enumerate() {
        thaw(node);
        node = match node {
            Node::Map(children) => {
                children
                    .get_mut(&step.as_key())
                    .ok_or_else(|| DraftError::PathNotFound {
                        path: path.truncated(i + 1),
                    })?
            }
            Node::List(items) => {
                let index = step.as_index().ok_or_else(|| DraftError::TypeMismatch {
                    path: path.truncated(i),
                    expected: ValueKind::Map,
                    found: ValueKind::List,
                })?;
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or_else(|| DraftError::IndexOutOfBounds {
                        path: path.truncated(i),
                        index,
                        len,
                    })?
            }
            Node::Val(v) => {
                return Err(DraftError::TypeMismatch {
                    path: path.truncated(i),
                    expected: expected_container(step),
                    found: v.kind(),
                });
            }
        };
    }
    thaw(node);
    Ok(node)
}

/// Shallow-copy a `Val` composite into a shadow node of `Val` children.
/// Scalars are left alone.
fn thaw(node: &mut Node) {
    let replacement = match node {
        Node::Val(Value::Map(entries)) => Some(Node::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), Node::Val(v.clone())))
                .collect(),
        )),
        Node::Val(Value::List(items)) => Some(Node::List(
            items.iter().map(|v| Node::Val(v.clone())).collect(),
        )),
        _ => None,
    };
    if let Some(replacement) = replacement {
        *node = replacement;
    }
}
