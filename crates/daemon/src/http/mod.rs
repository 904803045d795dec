// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface of the drone daemon.
//!
//! One bearer token guards every route. Handlers read the whole body into
//! memory before parsing and answer JSON; stream endpoints answer
//! server-sent events. Any handler error becomes `{"error": message}` with
//! the matching status code.

mod health;
mod input;
mod output;
mod process;
mod prompts;
mod terminal;

use crate::state::AppState;
use crate::supervisor::SupervisorError;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use drone_adapters::SessionAdapter;
use drone_storage::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// `Content-Type` of every JSON response, per the wire protocol.
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Assemble the full router.
pub fn build_router<S: SessionAdapter>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/v1/health", get(health::health::<S>))
        .route("/v1/status", get(health::status::<S>))
        .route("/v1/process/start", post(process::start::<S>))
        .route("/v1/process/stop", post(process::stop::<S>))
        .route("/v1/input", post(input::input::<S>))
        .route("/v1/keys", post(input::keys::<S>))
        .route("/v1/terminal/input", post(terminal::input::<S>))
        .route("/v1/terminal/output", get(terminal::output::<S>))
        .route("/v1/terminal/output/stream", get(terminal::stream::<S>))
        .route("/v1/terminal/prompt", get(terminal::prompt::<S>))
        .route("/v1/output", get(output::output::<S>))
        .route("/v1/output/stream", get(output::stream::<S>))
        .route("/v1/prompts/enqueue", post(prompts::enqueue::<S>))
        .route("/v1/prompts/{id}", get(prompts::get::<S>))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer::<S>,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Exact-match bearer authentication for every route.
async fn require_bearer<S: SessionAdapter>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
    next: Next,
) -> Response {
    let expected = format!("Bearer {}", state.config.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !authorized {
        return ApiError::unauthorized().into_response();
    }
    next.run(request).await
}

/// JSON responder pinning the charset parameter on `Content-Type`.
///
/// `axum::Json` alone answers with a bare `application/json`; the wire
/// protocol mandates `application/json; charset=utf-8`.
struct ApiJson<T>(T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            Json(self.0),
        )
            .into_response()
    }
}

/// Handler error carrying an HTTP status and a client-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "unauthorized".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiJson(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<SupervisorError> for ApiError {
    fn from(e: SupervisorError) -> Self {
        match e {
            SupervisorError::Conflict(_) => ApiError::conflict(e.to_string()),
            SupervisorError::NoTarget => ApiError::bad_request(e.to_string()),
            SupervisorError::Spawn(_) | SupervisorError::Store(_) => {
                ApiError::internal(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::internal(e.to_string())
    }
}

/// Parse a fully buffered JSON body.
fn parse_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::bad_request(format!("invalid body: {e}")))
}

/// Validate an externally supplied session name.
fn checked_session(name: &str) -> Result<&str, ApiError> {
    if drone_core::valid_session_name(name) {
        Ok(name)
    } else {
        Err(ApiError::bad_request("invalid session name"))
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
