//! JSONL patch log: durable history of produce operations.
//!
//! One `PatchRecord` per line. `vellum.patch.v1` is the envelope:
//! - deterministic replay from any base document
//! - strictly increasing `seq` so a log has exactly one order
//!
//! Blank lines and `#` comments are skipped on read. Writes go through
//! a tmp file, fsync, and rename so a crash never leaves a torn log.

use crate::apply::{PatchError, apply};
use crate::diff::diff;
use crate::patch::Patch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path as FsPath, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use vellum_kernel::Value;

pub const PATCH_RECORD_SCHEMA: &str = "vellum.patch.v1";

fn default_patch_record_schema() -> String {
    PATCH_RECORD_SCHEMA.to_string()
}

/// One logged produce: the patches of a single base → next transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    #[serde(default = "default_patch_record_schema")]
    pub schema: String,
    pub seq: u64,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub actor: String,
    pub patches: Vec<Patch>,
}

impl PatchRecord {
    pub fn new(seq: u64, patches: Vec<Patch>) -> Self {
        Self {
            schema: PATCH_RECORD_SCHEMA.to_string(),
            seq,
            recorded_at: Utc::now(),
            actor: String::new(),
            patches,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}

/// Build the record for a base → next transition by diffing the two.
pub fn record(base: &Value, next: &Value, seq: u64, actor: &str) -> PatchRecord {
    PatchRecord::new(seq, diff(base, next)).with_actor(actor)
}

/// The `seq` the next record appended to `records` must carry.
pub fn next_seq(records: &[PatchRecord]) -> u64 {
    records.last().map(|r| r.seq + 1).unwrap_or(1)
}

/// Errors reading, writing, or replaying a patch log.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("line {0}: io error: {1}")]
    Io(usize, String),
    #[error("line {0}: invalid record: {1}")]
    Parse(usize, String),
    #[error("line {line}: unsupported schema {found:?} (expected {PATCH_RECORD_SCHEMA:?})")]
    Schema { line: usize, found: String },
    #[error("record seq {seq} is not after {prev}")]
    OutOfOrder { prev: u64, seq: u64 },
    #[error("replaying record seq {seq}: {source}")]
    Replay {
        seq: u64,
        #[source]
        source: PatchError,
    },
    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Read records from a JSONL reader.
pub fn read_records(reader: impl BufRead) -> Result<Vec<PatchRecord>, LogError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LogError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: PatchRecord = serde_json::from_str(trimmed)
            .map_err(|e| LogError::Parse(line_no + 1, e.to_string()))?;
        if record.schema != PATCH_RECORD_SCHEMA {
            return Err(LogError::Schema {
                line: line_no + 1,
                found: record.schema,
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// Write records to a JSONL writer.
pub fn write_records(writer: &mut impl Write, records: &[PatchRecord]) -> Result<(), LogError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| LogError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| LogError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read records from a JSONL file path. A missing file is an empty log.
pub fn read_records_from_path(path: impl AsRef<FsPath>) -> Result<Vec<PatchRecord>, LogError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file =
        File::open(path).map_err(|e| LogError::Io(0, format!("{}: {e}", path.display())))?;
    read_records(BufReader::new(file))
}

/// Write records to a JSONL file path, atomically.
pub fn write_records_to_path(
    path: impl AsRef<FsPath>,
    records: &[PatchRecord],
) -> Result<(), LogError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| LogError::Io(0, format!("{parent:?}: {e}")))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), LogError> {
        let file = File::create(&tmp_path)
            .map_err(|e| LogError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let mut writer = BufWriter::new(file);
        write_records(&mut writer, records)?;
        writer
            .flush()
            .map_err(|e| LogError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let file = writer
            .into_inner()
            .map_err(|e| LogError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        file.sync_all()
            .map_err(|e| LogError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LogError::Io(
            0,
            format!("{} -> {}: {e}", tmp_path.display(), path.display()),
        )
    })?;

    Ok(())
}

/// Append one record to the log at `path`, enforcing seq order.
pub fn append_record_to_path(
    path: impl AsRef<FsPath>,
    record: PatchRecord,
) -> Result<(), LogError> {
    let path = path.as_ref();
    let mut records = read_records_from_path(path)?;
    if let Some(last) = records.last()
        && record.seq <= last.seq
    {
        return Err(LogError::OutOfOrder {
            prev: last.seq,
            seq: record.seq,
        });
    }
    records.push(record);
    write_records_to_path(path, &records)
}

/// Fold the log over `base`, producing the final document.
///
/// Records must carry strictly increasing `seq` values; the first
/// violation or unapplicable patch aborts the replay.
pub fn replay(base: &Value, records: &[PatchRecord]) -> Result<Value, LogError> {
    let mut state = base.clone();
    let mut prev: Option<u64> = None;
    for record in records {
        if let Some(prev_seq) = prev
            && record.seq <= prev_seq
        {
            return Err(LogError::OutOfOrder {
                prev: prev_seq,
                seq: record.seq,
            });
        }
        prev = Some(record.seq);
        state = apply(&state, &record.patches).map_err(|source| LogError::Replay {
            seq: record.seq,
            source,
        })?;
    }
    Ok(state)
}

fn tmp_write_path(path: &FsPath) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
