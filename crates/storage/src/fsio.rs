// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file persistence and bounded reads.
//!
//! Writes go to `<path>.<hex>.tmp`, get fsync'd, then rename over the
//! destination so a crash mid-write never leaves a torn file. Reads are
//! deliberately forgiving: missing or unparseable files fall back to a
//! caller-supplied default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Ceiling for bounded text reads (captured stdout/stderr).
pub const MAX_TEXT_BYTES: usize = 2 * 1024 * 1024;

/// Marker appended when a text read hits its byte ceiling.
const TRUNCATION_MARKER: &str = "\n\n…(truncated)…";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recursively create a directory.
pub fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Write `value` as two-space-indented JSON via temp-file + rename.
///
/// The parent directory is created if absent. The temp file is fsync'd
/// before the rename so the destination is durable once visible.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_file_name(format!(
        "{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        uuid::Uuid::new_v4().simple()
    ));

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read JSON from `path`, returning `default` when the file is missing or
/// unparseable.
pub fn read_json<T: DeserializeOwned>(path: &Path, default: T) -> T {
    let Ok(bytes) = fs::read(path) else {
        return default;
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unparseable JSON, using default");
            default
        }
    }
}

/// Read at most `max_bytes` of text from `path`.
///
/// Small files come back whole; larger ones are cut at `max_bytes` with a
/// literal truncation marker appended. Missing files read as empty.
pub fn read_text(path: &Path, max_bytes: usize) -> String {
    let Ok(file) = File::open(path) else {
        return String::new();
    };
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);

    let mut bytes = Vec::with_capacity(size.min(max_bytes as u64) as usize);
    if file.take(max_bytes as u64).read_to_end(&mut bytes).is_err() {
        return String::new();
    }

    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if size > max_bytes as u64 {
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

/// Parse a trimmed integer from `path`, or `None` when absent/invalid.
pub fn read_int(path: &Path) -> Option<i64> {
    let text = fs::read_to_string(path).ok()?;
    text.trim().parse().ok()
}

/// Size of `path` in bytes; 0 on any error.
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
#[path = "fsio_tests.rs"]
mod tests;
