// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for the drone daemon.
//!
//! On-disk job records, the bounded job index, and byte-offset reads of
//! growing log files. All JSON writes go through temp-file + rename so
//! external readers (the hub UI) never see torn records. There is no
//! locking: correctness relies on one daemon per data directory.

pub mod chunk;
pub mod fsio;
pub mod jobs;

pub use chunk::{read_chunk, Chunk, DEFAULT_CHUNK_BYTES, MAX_CHUNK_BYTES};
pub use fsio::{
    ensure_dir, file_size, read_int, read_json, read_text, write_json_atomic, StoreError,
    MAX_TEXT_BYTES,
};
pub use jobs::{JobStore, MAX_INDEX_ENTRIES};
