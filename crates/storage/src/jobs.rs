// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt-job records and the ordered job index.
//!
//! Records live at `jobs/<id>.json`, the index at `queue.json`. Index
//! entries whose record file is missing are treated as absent, not as an
//! error; the index itself is bounded to the most recent entries.

use crate::fsio::{read_json, write_json_atomic, StoreError};
use drone_core::{JobIndex, PromptJob};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Upper bound on retained index entries.
pub const MAX_INDEX_ENTRIES: usize = 400;

/// File-backed store for prompt jobs and their index.
#[derive(Debug, Clone)]
pub struct JobStore {
    jobs_dir: PathBuf,
    index_path: PathBuf,
}

impl JobStore {
    /// Store rooted at the prompts directory (`<data-dir>/prompts`).
    pub fn new(prompts_dir: &Path) -> Self {
        Self {
            jobs_dir: prompts_dir.join("jobs"),
            index_path: prompts_dir.join("queue.json"),
        }
    }

    pub fn job_path(&self, id: &str) -> PathBuf {
        self.jobs_dir.join(format!("{id}.json"))
    }

    /// Load one job record; `None` when missing or unparseable.
    pub fn load_job(&self, id: &str) -> Option<PromptJob> {
        read_json(&self.job_path(id), None)
    }

    /// Persist one job record via atomic rename.
    pub fn save_job(&self, job: &PromptJob) -> Result<(), StoreError> {
        write_json_atomic(&self.job_path(&job.id), job)
    }

    /// Load the ordered index; empty when missing.
    pub fn load_index(&self) -> JobIndex {
        read_json(&self.index_path, JobIndex::default())
    }

    /// Persist the index, deduplicated (first occurrence wins) and bounded
    /// to the newest [`MAX_INDEX_ENTRIES`] entries.
    pub fn save_index(&self, index: &JobIndex) -> Result<(), StoreError> {
        let deduped: IndexSet<&String> = index.order.iter().collect();
        let skip = deduped.len().saturating_sub(MAX_INDEX_ENTRIES);
        let bounded = JobIndex {
            order: deduped.into_iter().skip(skip).cloned().collect(),
        };
        write_json_atomic(&self.index_path, &bounded)
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
