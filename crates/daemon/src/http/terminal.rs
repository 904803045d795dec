// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-session endpoints: raw input, pane-log reads, prompt capture.
//!
//! Session names arrive from untrusted callers and are validated against
//! the conservative grammar before any tmux operation.

use super::output::{default_max, sse_tail};
use super::{checked_session, parse_body, ApiError, ApiJson};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use drone_adapters::{SessionAdapter, SessionError};
use drone_storage::{file_size, read_chunk, Chunk};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Ceiling on pasted input, in UTF-8 bytes.
const MAX_INPUT_BYTES: usize = 128 * 1024;

#[derive(Debug, Deserialize)]
struct TerminalInputBody {
    session: String,
    data: String,
}

/// POST /v1/terminal/input — paste raw text (no newline appended).
pub async fn input<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: TerminalInputBody = parse_body(&body)?;
    checked_session(&req.session)?;
    if req.data.len() > MAX_INPUT_BYTES {
        return Err(ApiError::too_large("input too large"));
    }
    if !state.adapter.exists(&req.session).await {
        return Err(ApiError::not_found("session not found"));
    }

    state
        .adapter
        .paste_text(&req.session, &req.data)
        .await
        .map_err(|e| match e {
            SessionError::NotFound(_) => ApiError::not_found("session not found"),
            other => ApiError::internal(other.to_string()),
        })?;
    Ok((StatusCode::ACCEPTED, ApiJson(json!({ "ok": true }))))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionChunkQuery {
    session: String,
    #[serde(default)]
    since: u64,
    #[serde(default = "default_max")]
    max: usize,
}

/// GET /v1/terminal/output — bounded chunk of a session's pane log.
pub async fn output<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SessionChunkQuery>,
) -> Result<ApiJson<Chunk>, ApiError> {
    checked_session(&params.session)?;
    let path = state.config.session_log_path(&params.session);
    Ok(ApiJson(read_chunk(&path, params.since, params.max)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionStreamQuery {
    session: String,
    #[serde(default)]
    since: Option<u64>,
}

/// GET /v1/terminal/output/stream — SSE tail of a session's pane log.
pub async fn stream<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SessionStreamQuery>,
) -> Result<impl IntoResponse, ApiError> {
    checked_session(&params.session)?;
    let path = state.config.session_log_path(&params.session);
    let start = params.since.unwrap_or_else(|| file_size(&path));
    Ok(sse_tail(path, start, Some(params.session)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PromptQuery {
    session: String,
}

/// GET /v1/terminal/prompt — the line at the session's cursor row.
pub async fn prompt<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<PromptQuery>,
) -> Result<ApiJson<serde_json::Value>, ApiError> {
    checked_session(&params.session)?;
    if !state.adapter.exists(&params.session).await {
        return Err(ApiError::not_found("session not found"));
    }

    let line = state
        .adapter
        .prompt_line(&params.session)
        .await
        .map_err(|e| match e {
            SessionError::NotFound(_) => ApiError::not_found("session not found"),
            other => ApiError::internal(other.to_string()),
        })?;
    Ok(ApiJson(json!({ "ok": true, "session": params.session, "line": line })))
}
