// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and key input to the foreground session.

use super::{checked_session, parse_body, ApiError, ApiJson};
use crate::state::AppState;
use crate::supervisor::DEFAULT_SESSION;
use axum::body::Bytes;
use axum::extract::State;
use drone_adapters::SessionAdapter;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn default_enter() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct InputBody {
    text: String,
    #[serde(default = "default_enter")]
    enter: bool,
    #[serde(default)]
    session: Option<String>,
}

/// Explicit session wins, else the recorded foreground session, else the
/// supervisor's default.
async fn resolve_target<S: SessionAdapter>(
    state: &AppState<S>,
    session: Option<String>,
) -> Result<String, ApiError> {
    match session {
        Some(name) => {
            checked_session(&name)?;
            Ok(name)
        }
        None => {
            let supervisor = state.supervisor.lock().await;
            Ok(supervisor
                .record()
                .map(|r| r.session)
                .unwrap_or_else(|| DEFAULT_SESSION.to_string()))
        }
    }
}

/// POST /v1/input — type literal text into the target session.
pub async fn input<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<ApiJson<Value>, ApiError> {
    let req: InputBody = parse_body(&body)?;
    let target = resolve_target(&state, req.session).await?;

    state
        .adapter
        .send_text(&target, &req.text, req.enter)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ApiJson(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
struct KeysBody {
    keys: Vec<String>,
    #[serde(default)]
    session: Option<String>,
}

/// POST /v1/keys — send named keys to the target session.
pub async fn keys<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<ApiJson<Value>, ApiError> {
    let req: KeysBody = parse_body(&body)?;
    if req.keys.is_empty() {
        return Err(ApiError::bad_request("missing keys"));
    }
    let target = resolve_target(&state, req.session).await?;

    state
        .adapter
        .send_keys(&target, &req.keys)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ApiJson(json!({ "ok": true })))
}
