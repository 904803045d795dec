// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground-process endpoints.

use super::{checked_session, parse_body, ApiError, ApiJson};
use crate::state::AppState;
use crate::supervisor::StartRequest;
use axum::body::Bytes;
use axum::extract::State;
use drone_adapters::SessionAdapter;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct StartBody {
    cmd: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    cwd: Option<PathBuf>,
    #[serde(default)]
    env: Option<BTreeMap<String, String>>,
    #[serde(default)]
    session: Option<String>,
    #[serde(default)]
    force: bool,
}

/// POST /v1/process/start
pub async fn start<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<ApiJson<Value>, ApiError> {
    let req: StartBody = parse_body(&body)?;
    if req.cmd.is_empty() {
        return Err(ApiError::bad_request("missing cmd"));
    }
    if let Some(ref session) = req.session {
        checked_session(session)?;
    }

    let supervisor = state.supervisor.lock().await;
    let record = supervisor
        .start(StartRequest {
            cmd: req.cmd,
            args: req.args,
            cwd: req.cwd,
            env: req.env,
            session: req.session,
            force: req.force,
        })
        .await?;

    Ok(ApiJson(json!({ "ok": true, "process": record })))
}

#[derive(Debug, Deserialize)]
struct StopBody {
    #[serde(default)]
    session: Option<String>,
}

/// POST /v1/process/stop
pub async fn stop<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<ApiJson<Value>, ApiError> {
    let req: StopBody = if body.is_empty() {
        StopBody { session: None }
    } else {
        parse_body(&body)?
    };
    if let Some(ref session) = req.session {
        checked_session(session)?;
    }

    let supervisor = state.supervisor.lock().await;
    let stopped = supervisor.stop(req.session).await?;
    Ok(ApiJson(json!({ "ok": true, "session": stopped })))
}
