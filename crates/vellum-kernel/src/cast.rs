//! Cast utilities: zero-cost mutability assertions.
//!
//! `Immutable<T>` grants only shared access to its contents. The two
//! casts move a value across that boundary without transforming it —
//! both compile to nothing and hold `cast_mutable(cast_immutable(x))
//! == x` by strict identity.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A value with mutable access withheld.
///
/// `Deref` (and `get`) expose the contents read-only; recovering
/// ownership goes through [`cast_mutable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Immutable<T>(T);

impl<T> Immutable<T> {
    pub fn new(value: T) -> Self {
        Immutable(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Immutable<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Immutable<T> {
    fn from(value: T) -> Self {
        Immutable(value)
    }
}

/// Assert that a value should be treated as immutable from here on.
pub fn cast_immutable<T>(value: T) -> Immutable<T> {
    Immutable(value)
}

/// Assert that an immutable value may be treated as mutable again.
pub fn cast_mutable<T>(value: Immutable<T>) -> T {
    value.0
}

/// Borrowing form of [`cast_mutable`].
pub fn as_mutable<T>(value: &Immutable<T>) -> &T {
    &value.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn casts_are_strict_identity() {
        let value = Value::map([("done".to_string(), Value::from(false))]);
        let frozen = cast_immutable(value.clone());
        assert!(as_mutable(&frozen).ptr_eq(&value));
        let thawed = cast_mutable(frozen);
        assert!(thawed.ptr_eq(&value));
    }

    #[test]
    fn immutable_exposes_shared_access_only() {
        let frozen = Immutable::new(vec![1, 2, 3]);
        assert_eq!(frozen.len(), 3);
        assert_eq!(frozen.get()[0], 1);
        let inner = frozen.into_inner();
        assert_eq!(inner, vec![1, 2, 3]);
    }

    #[test]
    fn serde_is_transparent() {
        let frozen = Immutable::new(vec![1, 2]);
        assert_eq!(serde_json::to_string(&frozen).unwrap(), "[1,2]");
        let back: Immutable<Vec<i32>> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(back, frozen);
    }
}
