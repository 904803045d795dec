// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness and process status.

use super::{ApiError, ApiJson};
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use drone_adapters::SessionAdapter;
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /v1/health
pub async fn health<S: SessionAdapter>(State(state): State<Arc<AppState<S>>>) -> ApiJson<Value> {
    ApiJson(json!({
        "ok": true,
        "name": state.config.name,
        "time": Utc::now().to_rfc3339(),
    }))
}

/// GET /v1/status — the process record (possibly null) with live `running`.
pub async fn status<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<ApiJson<Value>, ApiError> {
    let supervisor = state.supervisor.lock().await;
    let (record, running) = supervisor.status().await;
    Ok(ApiJson(json!({
        "process": record,
        "running": running,
    })))
}
