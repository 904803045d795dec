// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The prompt pump: single-writer scheduling of the job queue.
//!
//! One pump body runs at a time. It finalizes running jobs whose session
//! disappeared, then — only when nothing is running — starts the first
//! queued job in index order. Driven by a periodic tick plus opportunistic
//! wakeups after every enqueue; state lives on disk, so a daemon restart
//! re-enters the same loop and recovers.

use crate::finalize;
use crate::script;
use crate::state::AppState;
use chrono::Utc;
use drone_adapters::{SessionAdapter, SessionSpec};
use drone_core::{JobState, PromptJob};
use std::os::unix::fs::PermissionsExt;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Cadence of the periodic pump tick.
pub const PUMP_INTERVAL: Duration = Duration::from_millis(400);

/// Run one pump, unless another pump body is already executing.
pub async fn pump<S: SessionAdapter>(state: &AppState<S>) {
    if state.pump_busy.swap(true, Ordering::SeqCst) {
        return;
    }
    run_body(state).await;
    state.pump_busy.store(false, Ordering::SeqCst);
}

async fn run_body<S: SessionAdapter>(state: &AppState<S>) {
    let index = state.jobs.load_index();
    let ids: Vec<&str> = index
        .order
        .iter()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .collect();

    // Pass 1: reconcile running jobs against the live session table.
    let mut any_running = false;
    for id in &ids {
        let Some(mut job) = state.jobs.load_job(id) else {
            continue;
        };
        if job.state != JobState::Running {
            continue;
        }
        if state.adapter.exists(&job.session_name()).await {
            any_running = true;
            continue;
        }

        tracing::info!(job = %job.id, "session gone, finalizing");
        finalize::finalize(&mut job).await;
        if let Err(e) = state.jobs.save_job(&job) {
            tracing::error!(job = %job.id, error = %e, "failed to save finalized job");
        }
    }

    if any_running {
        return;
    }

    // Pass 2: start the first queued job, FIFO by index order.
    for id in &ids {
        let Some(mut job) = state.jobs.load_job(id) else {
            continue;
        };
        if job.state != JobState::Queued {
            continue;
        }

        let now = Utc::now();
        job.state = JobState::Running;
        job.started_at = Some(now);
        job.updated_at = now;
        if let Err(e) = state.jobs.save_job(&job) {
            tracing::error!(job = %job.id, error = %e, "failed to mark job running");
            return;
        }

        if let Err(e) = start_job(state, &job).await {
            tracing::error!(job = %job.id, error = %e, "failed to start job");
            let now = Utc::now();
            job.state = JobState::Failed;
            job.finished_at = Some(now);
            job.updated_at = now;
            job.error = Some(e);
            if let Err(e) = state.jobs.save_job(&job) {
                tracing::error!(job = %job.id, error = %e, "failed to record start failure");
            }
        } else {
            tracing::info!(job = %job.id, session = %job.session_name(), "job started");
        }
        return;
    }
}

/// Write the launcher script and spin up the job's session.
async fn start_job<S: SessionAdapter>(state: &AppState<S>, job: &PromptJob) -> Result<(), String> {
    let script_path = job.script_path();
    let body = script::compose(job);
    std::fs::write(&script_path, body).map_err(|e| format!("write script: {e}"))?;

    // Owner-only: the script may embed environment values
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| format!("chmod script: {e}"))?;

    let spec = SessionSpec {
        name: job.session_name(),
        cmd: "bash".to_string(),
        args: vec![script_path.to_string_lossy().into_owned()],
        cwd: None,
        env: Vec::new(),
    };
    state.adapter.start(&spec).await.map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
