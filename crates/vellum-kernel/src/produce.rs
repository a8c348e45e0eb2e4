//! Producers: base value in, draft-edited value out.
//!
//! `produce` is the whole contract in one call: open a draft over the
//! base, run the recipe, finish. The curried constructors pre-bind the
//! recipe (and optionally a seed base) into a reusable producer.

use crate::draft::Draft;
use crate::error::DraftError;
use crate::value::Value;

/// Apply `recipe` to a draft of `base` and return the produced value.
///
/// The base is never modified. If the recipe makes no effective edit,
/// the result is `ptr_eq` to the base.
pub fn produce<F>(base: &Value, recipe: F) -> Value
where
    F: FnOnce(&mut Draft),
{
    let mut draft = Draft::new(base.clone());
    recipe(&mut draft);
    draft.finish()
}

/// Fallible form: the recipe may abort with a `DraftError`, in which
/// case the draft is discarded and no value is produced.
pub fn try_produce<F>(base: &Value, recipe: F) -> Result<Value, DraftError>
where
    F: FnOnce(&mut Draft) -> Result<(), DraftError>,
{
    let mut draft = Draft::new(base.clone());
    recipe(&mut draft)?;
    Ok(draft.finish())
}

/// Curry a recipe into a reusable producer awaiting its base value.
pub fn producer<F>(recipe: F) -> impl Fn(&Value) -> Value
where
    F: Fn(&mut Draft),
{
    move |base| produce(base, |draft| recipe(draft))
}

/// Curry a recipe that takes one extra argument alongside the draft.
pub fn producer_with<A, F>(recipe: F) -> impl Fn(&Value, A) -> Value
where
    F: Fn(&mut Draft, A),
{
    move |base, arg| produce(base, |draft| recipe(draft, arg))
}

/// Curry a recipe together with a seed base. Calling the producer with
/// `None` applies the recipe to the seed; `Some(base)` overrides it.
pub fn producer_seeded<F>(recipe: F, seed: Value) -> impl Fn(Option<&Value>) -> Value
where
    F: Fn(&mut Draft),
{
    move |base| produce(base.unwrap_or(&seed), |draft| recipe(draft))
}
