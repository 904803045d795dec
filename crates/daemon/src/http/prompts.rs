// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt-job endpoints: enqueue and poll.

use super::{parse_body, ApiError, ApiJson};
use crate::state::AppState;
use crate::{finalize, scheduler};
use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use drone_adapters::SessionAdapter;
use drone_core::{valid_job_id, JobState, NewJob, PromptJob};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct EnqueueBody {
    id: String,
    cmd: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    cwd: Option<PathBuf>,
    #[serde(default)]
    env: Option<BTreeMap<String, String>>,
}

/// Job record as a JSON value, with an optional annotation.
fn job_response(job: &PromptJob, note: Option<&str>) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(job)
        .map_err(|e| ApiError::internal(format!("serialize job: {e}")))?;
    if let (Some(note), Some(map)) = (note, value.as_object_mut()) {
        map.insert("note".to_string(), Value::String(note.to_string()));
    }
    Ok(value)
}

/// POST /v1/prompts/enqueue — idempotent on duplicate IDs.
pub async fn enqueue<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: EnqueueBody = parse_body(&body)?;
    if !valid_job_id(&req.id) {
        return Err(ApiError::bad_request("invalid id"));
    }
    if req.cmd.is_empty() {
        return Err(ApiError::bad_request("missing cmd"));
    }

    if let Some(existing) = state.jobs.load_job(&req.id) {
        let value = job_response(&existing, Some("already exists"))?;
        return Ok((StatusCode::OK, ApiJson(value)));
    }

    let job = PromptJob::create(
        NewJob {
            id: req.id,
            cmd: req.cmd,
            args: req.args,
            kind: req.kind,
            cwd: req.cwd,
            env: req.env,
        },
        &state.config.out_dir(),
        Utc::now(),
    );
    state.jobs.save_job(&job)?;

    let mut index = state.jobs.load_index();
    index.order.push(job.id.clone());
    state.jobs.save_index(&index)?;

    // Wake the pump; the enqueue is already durable
    let pump_state = Arc::clone(&state);
    tokio::spawn(async move {
        scheduler::pump(pump_state.as_ref()).await;
    });

    let value = job_response(&job, None)?;
    Ok((StatusCode::ACCEPTED, ApiJson(value)))
}

/// GET /v1/prompts/{id} — the record, finalized on read when its session
/// has already disappeared.
pub async fn get<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    UrlPath(id): UrlPath<String>,
) -> Result<ApiJson<Value>, ApiError> {
    let Some(mut job) = state.jobs.load_job(&id) else {
        return Err(ApiError::not_found("job not found"));
    };

    if job.state == JobState::Running && !state.adapter.exists(&job.session_name()).await {
        finalize::finalize(&mut job).await;
        if let Err(e) = state.jobs.save_job(&job) {
            tracing::error!(job = %job.id, error = %e, "failed to save finalized job");
        }
    }

    Ok(ApiJson(job_response(&job, None)?))
}
