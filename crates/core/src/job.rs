// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt-job record and state machine.
//!
//! A [`PromptJob`] is a queued/running/finished external command whose
//! stdio is captured to files under the output directory. Records are
//! persisted as JSON and read directly by the hub UI, so field names are
//! camelCase on disk.

use crate::name::job_session_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// State of a prompt job.
///
/// Transitions are monotone along a single path:
/// `queued → running → done | failed`. No other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobState {
    /// Whether this state is terminal (`done` or `failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Queued => write!(f, "queued"),
            JobState::Running => write!(f, "running"),
            JobState::Done => write!(f, "done"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// Caller-supplied definition of a new prompt job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: String,
    pub cmd: String,
    pub args: Vec<String>,
    pub kind: Option<String>,
    pub cwd: Option<PathBuf>,
    pub env: Option<BTreeMap<String, String>>,
}

/// A queued/running/finished external command with file-backed capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptJob {
    pub id: String,
    /// Free-form tag; influences the finalize heuristic (e.g. `codex`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub exit_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromptJob {
    /// Build a fresh `queued` job with capture paths derived from the ID
    /// under `out_dir`.
    pub fn create(req: NewJob, out_dir: &Path, now: DateTime<Utc>) -> Self {
        Self {
            stdout_path: out_dir.join(format!("{}.stdout.txt", req.id)),
            stderr_path: out_dir.join(format!("{}.stderr.txt", req.id)),
            exit_path: out_dir.join(format!("{}.exit.txt", req.id)),
            id: req.id,
            kind: req.kind,
            cmd: req.cmd,
            args: req.args,
            cwd: req.cwd,
            env: req.env,
            state: JobState::Queued,
            created_at: now,
            updated_at: now,
            started_at: None,
            finished_at: None,
            exit_code: None,
            stdout: None,
            stderr: None,
            error: None,
        }
    }

    /// Path of the launcher script, sibling to the capture files.
    pub fn script_path(&self) -> PathBuf {
        self.stdout_path.with_file_name(format!("{}.run.sh", self.id))
    }

    /// Deterministic tmux session name for this job.
    pub fn session_name(&self) -> String {
        job_session_name(&self.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Ordered sequence of job IDs, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobIndex {
    #[serde(default)]
    pub order: Vec<String>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
