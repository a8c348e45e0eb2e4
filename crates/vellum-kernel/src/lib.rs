//! # Vellum Kernel
//!
//! Structural-sharing immutable updates through mutable drafts: open a
//! draft over an immutable base value, edit it in place, and finish
//! with a new value that shares every untouched subtree with the base.
//! The base is never modified; a draft with no effective edits finishes
//! as the base itself.
//!
//! ## Architecture
//!
//! ```text
//! Value                 ← immutable JSON-shaped tree, Arc-backed
//!     │
//! Path                  ← pointer-style addresses into the tree
//!     │
//! Draft                 ← copy-on-write shadow tree for one produce
//!     │
//! produce / producer    ← base + recipe → new value (curried forms)
//!     │
//! Immutable / ArcDraft  ← zero-cost casts and typed drafts
//! ```
//!
//! Patch generation, application, and the patch log live in
//! `vellum-patch`; this crate is the engine alone.

pub mod cast;
pub mod draft;
pub mod error;
pub mod path;
pub mod produce;
pub mod shared;
pub mod value;

pub use cast::{Immutable, as_mutable, cast_immutable, cast_mutable};
pub use draft::Draft;
pub use error::DraftError;
pub use path::{Path, PathParseError, Step};
pub use produce::{produce, producer, producer_seeded, producer_with, try_produce};
pub use shared::{ArcDraft, produce_arc};
pub use value::{ContentHash, Value, ValueKind};
