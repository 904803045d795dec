// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-offset reads of growing log files.
//!
//! Log files are appended to by tmux `pipe-pane`; readers hand in an offset
//! and get back the next bounded chunk plus the offset to resume from. Reads
//! tolerate concurrent growth and truncation by clamping to the current file
//! size, so no locking is needed.

use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Hard ceiling on a single chunk read.
pub const MAX_CHUNK_BYTES: usize = 1024 * 1024;

/// Default chunk size when the caller does not specify one.
pub const DEFAULT_CHUNK_BYTES: usize = 64 * 1024;

/// One bounded read of a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub chunk: String,
    pub next_offset: u64,
}

impl Chunk {
    fn empty(at: u64) -> Self {
        Self {
            chunk: String::new(),
            next_offset: at,
        }
    }
}

/// Read up to `max` bytes of `path` starting at byte `since`.
///
/// `max` is clamped into `[1, MAX_CHUNK_BYTES]`. An offset at or past the
/// end of the file yields an empty chunk echoing `since`, and any I/O error
/// does the same; `next_offset` never moves backwards.
pub fn read_chunk(path: &Path, since: u64, max: usize) -> Chunk {
    let max = max.clamp(1, MAX_CHUNK_BYTES);

    let size = crate::fsio::file_size(path);
    if since >= size {
        return Chunk::empty(since);
    }

    let Ok(mut file) = File::open(path) else {
        return Chunk::empty(since);
    };
    if file.seek(SeekFrom::Start(since)).is_err() {
        return Chunk::empty(since);
    }

    let mut bytes = Vec::with_capacity(max.min((size - since) as usize));
    if file.take(max as u64).read_to_end(&mut bytes).is_err() {
        return Chunk::empty(since);
    }

    let read = bytes.len() as u64;
    Chunk {
        chunk: String::from_utf8_lossy(&bytes).into_owned(),
        next_offset: since + read,
    }
}

#[cfg(test)]
#[path = "chunk_tests.rs"]
mod tests;
