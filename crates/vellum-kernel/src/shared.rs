//! Typed drafts over arbitrary `Clone` state behind `Arc`.
//!
//! The same produce contract as the value-tree engine, rendered for
//! plain Rust types: the draft derefs to the base until the recipe
//! takes mutable access, at which point the inner value is cloned once.
//! A recipe that never takes mutable access yields a pointer-equal
//! `Arc`.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A lazily cloned draft of `T`.
///
/// Mutable access counts as an edit: the first `DerefMut` clones the
/// base, and the produce result is a fresh `Arc` from then on.
pub struct ArcDraft<'a, T: Clone> {
    base: &'a Arc<T>,
    edit: Option<T>,
}

impl<T: Clone> ArcDraft<'_, T> {
    /// The untouched base value.
    pub fn original(&self) -> &T {
        self.base
    }

    /// Whether the recipe has taken mutable access.
    pub fn is_modified(&self) -> bool {
        self.edit.is_some()
    }
}

impl<T: Clone> Deref for ArcDraft<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.edit.as_ref().unwrap_or(self.base)
    }
}

impl<T: Clone> DerefMut for ArcDraft<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.edit.get_or_insert_with(|| T::clone(self.base))
    }
}

/// Apply `recipe` to a draft of `base` and return the produced `Arc`.
///
/// Returns `Arc::clone(base)` — pointer-equal — when the recipe never
/// took mutable access.
pub fn produce_arc<T, F>(base: &Arc<T>, recipe: F) -> Arc<T>
where
    T: Clone,
    F: FnOnce(&mut ArcDraft<T>),
{
    let mut draft = ArcDraft { base, edit: None };
    recipe(&mut draft);
    match draft.edit {
        Some(edited) => Arc::new(edited),
        None => Arc::clone(base),
    }
}
