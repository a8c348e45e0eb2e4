//! # vellum-patch
//!
//! Patches over `vellum-kernel` values.
//!
//! This crate provides:
//! - `Patch` (the JSON-Patch-flavored wire type)
//! - structural diffing and inversion (`diff`, `produce_with_patches`)
//! - transactional application (`apply`)
//! - a JSONL patch log with seq-ordered deterministic replay
//!
//! It intentionally holds no draft mechanics of its own: application
//! runs through the kernel's produce path, so patched documents share
//! structure with their bases exactly like hand-written recipes.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one PatchRecord per line)
//!     ↕  append / replay
//! Vec<Patch> (one produce's base → next transition)
//! ```

pub mod apply;
pub mod diff;
pub mod log;
pub mod patch;

pub use apply::{PatchError, apply};
pub use diff::{diff, produce_with_patches, verify_patches};
pub use log::{
    LogError, PATCH_RECORD_SCHEMA, PatchRecord, append_record_to_path, next_seq, read_records,
    read_records_from_path, record, replay, write_records, write_records_to_path,
};
pub use patch::Patch;
