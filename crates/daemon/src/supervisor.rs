// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground-process supervisor.
//!
//! Tracks the single tracked process attached to a well-known session,
//! independent of the prompt queue. The record is one JSON file; stop
//! replaces it with an empty object. Callers hold the state mutex, which
//! is all the serialization a single-daemon data directory needs.

use chrono::Utc;
use drone_adapters::{SessionAdapter, SessionSpec};
use drone_core::ProcessRecord;
use drone_storage::{read_json, write_json_atomic, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Session used when `start` omits one.
pub const DEFAULT_SESSION: &str = "drone-main";

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("process already running in session {0}")]
    Conflict(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("no process to stop")]
    NoTarget,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Request to start (or force-replace) the foreground process.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub cmd: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Option<BTreeMap<String, String>>,
    pub session: Option<String>,
    pub force: bool,
}

pub struct Supervisor<S> {
    adapter: S,
    state_path: PathBuf,
    logs_dir: PathBuf,
}

impl<S: SessionAdapter> Supervisor<S> {
    pub fn new(adapter: S, state_path: PathBuf, logs_dir: PathBuf) -> Self {
        Self {
            adapter,
            state_path,
            logs_dir,
        }
    }

    /// The persisted record, or `None` when cleared/absent.
    pub fn record(&self) -> Option<ProcessRecord> {
        let value: serde_json::Value = read_json(&self.state_path, serde_json::Value::Null);
        serde_json::from_value(value).ok()
    }

    /// Start the foreground process.
    ///
    /// Conflicts unless `force`: an existing record, or a live session with
    /// the target name. With `force` the old session is killed first.
    pub async fn start(&self, req: StartRequest) -> Result<ProcessRecord, SupervisorError> {
        let session = req
            .session
            .unwrap_or_else(|| DEFAULT_SESSION.to_string());

        if let Some(existing) = self.record() {
            if !req.force {
                return Err(SupervisorError::Conflict(existing.session));
            }
        }
        if self.adapter.exists(&session).await {
            if !req.force {
                return Err(SupervisorError::Conflict(session));
            }
            self.adapter.kill(&session).await;
        }

        let log_path = self.logs_dir.join(format!("{session}.log"));
        if let Err(e) = std::fs::write(&log_path, b"") {
            tracing::warn!(path = %log_path.display(), error = %e, "could not truncate log");
        }

        let env_pairs: Vec<(String, String)> = req
            .env
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect();
        let spec = SessionSpec {
            name: session.clone(),
            cmd: req.cmd.clone(),
            args: req.args.clone(),
            cwd: req.cwd.clone(),
            env: env_pairs,
        };
        self.adapter
            .start(&spec)
            .await
            .map_err(|e| SupervisorError::Spawn(e.to_string()))?;

        // Pane capture is best-effort; the process is already running
        if let Err(e) = self.adapter.pipe_to_file(&session, &log_path).await {
            tracing::warn!(session = %session, error = %e, "pipe-pane failed");
        }

        let record = ProcessRecord {
            session,
            cmd: req.cmd,
            args: req.args,
            cwd: req.cwd,
            env: req.env,
            log_path,
            started_at: Utc::now(),
        };
        write_json_atomic(&self.state_path, &record)?;
        Ok(record)
    }

    /// Stop the foreground process and clear the record.
    ///
    /// Prefers the explicit session, else the recorded one.
    pub async fn stop(&self, session: Option<String>) -> Result<String, SupervisorError> {
        let target = session
            .or_else(|| self.record().map(|r| r.session))
            .ok_or(SupervisorError::NoTarget)?;

        if self.adapter.exists(&target).await {
            self.adapter.kill(&target).await;
        }
        write_json_atomic(&self.state_path, &serde_json::json!({}))?;
        Ok(target)
    }

    /// The record plus a live `running` check against the multiplexer.
    pub async fn status(&self) -> (Option<ProcessRecord>, bool) {
        let record = self.record();
        let running = match &record {
            Some(r) => self.adapter.exists(&r.session).await,
            None => false,
        };
        (record, running)
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
