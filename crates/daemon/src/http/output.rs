// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground-process log reads and streaming.

use super::{ApiError, ApiJson};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use drone_adapters::SessionAdapter;
use drone_storage::{file_size, read_chunk, Chunk, DEFAULT_CHUNK_BYTES};
use futures_util::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Cadence of the SSE poll loop.
const STREAM_TICK: Duration = Duration::from_millis(25);

/// Per-iteration read ceiling for streams.
const STREAM_CHUNK_BYTES: usize = 128 * 1024;

/// `Content-Type` of every SSE response, per the wire protocol.
const SSE_CONTENT_TYPE: &str = "text/event-stream; charset=utf-8";

pub(super) fn default_max() -> usize {
    DEFAULT_CHUNK_BYTES
}

#[derive(Debug, Deserialize)]
pub(super) struct ChunkParams {
    #[serde(default)]
    pub since: u64,
    #[serde(default = "default_max")]
    pub max: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct StreamParams {
    #[serde(default)]
    pub since: Option<u64>,
}

/// GET /v1/output — bounded chunk of the foreground log.
///
/// Null-safe: with no process record the response is an empty chunk
/// echoing `since`.
pub async fn output<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ChunkParams>,
) -> Result<ApiJson<Chunk>, ApiError> {
    let record = {
        let supervisor = state.supervisor.lock().await;
        supervisor.record()
    };
    let chunk = match record {
        Some(record) => read_chunk(&record.log_path, params.since, params.max),
        None => Chunk {
            chunk: String::new(),
            next_offset: params.since,
        },
    };
    Ok(ApiJson(chunk))
}

/// GET /v1/output/stream — SSE tail of the foreground log.
pub async fn stream<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<StreamParams>,
) -> Result<impl IntoResponse, ApiError> {
    let record = {
        let supervisor = state.supervisor.lock().await;
        supervisor.record()
    };
    let Some(record) = record else {
        return Err(ApiError::not_found("no process"));
    };

    let start = params
        .since
        .unwrap_or_else(|| file_size(&record.log_path));
    Ok(sse_tail(record.log_path, start, None))
}

/// SSE loop shared with the terminal stream: a `ready` frame carrying the
/// starting offset, then `output` frames for every non-empty chunk. Read
/// errors are swallowed; the loop dies with the client connection.
///
/// The header tuple overrides `Sse`'s bare `text/event-stream`.
pub(super) fn sse_tail(
    path: PathBuf,
    start: u64,
    session: Option<String>,
) -> impl IntoResponse {
    let stream = tail_events(path, start, session);
    (
        [
            (header::CONTENT_TYPE, SSE_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}

fn tail_events(
    path: PathBuf,
    start: u64,
    session: Option<String>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut ready = serde_json::json!({ "ok": true, "since": start });
        if let Some(ref session) = session {
            ready["session"] = serde_json::Value::String(session.clone());
        }
        if let Ok(data) = serde_json::to_string(&ready) {
            yield Ok::<_, Infallible>(Event::default().event("ready").data(data));
        }

        let mut offset = start;
        loop {
            tokio::time::sleep(STREAM_TICK).await;
            let chunk = read_chunk(&path, offset, STREAM_CHUNK_BYTES);
            if chunk.chunk.is_empty() {
                continue;
            }
            offset = chunk.next_offset;
            if let Ok(data) = serde_json::to_string(&chunk) {
                yield Ok(Event::default().event("output").data(data));
            }
        }
    }
}
