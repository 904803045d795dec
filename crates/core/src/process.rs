// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one tracked foreground process of the daemon.
//!
//! Orthogonal to prompt jobs: at most one record exists, attached to a
//! well-known tmux session whose pane output is piped to a log file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Record of the current foreground process.
///
/// Persisted as `state.json`. A cleared record is the literal `{}`; loading
/// treats anything that fails to parse as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub session: String,
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    pub log_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
