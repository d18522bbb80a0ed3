// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP routes
//!
//! Thin glue between axum and the hub. Each endpoint is reachable under a
//! short path and under the `/api/...` path older clients use.

use std::time::Instant;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use herald_core::{parse_baseline, HeraldError, HubStats, Resolution, Snapshot, TaskStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::lifecycle::StatusHub;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: StatusHub,
    pub started: Instant,
}

impl AppState {
    pub fn new(hub: StatusHub) -> Self {
        Self {
            hub,
            started: Instant::now(),
        }
    }
}

/// Build the router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/api/status", get(get_status))
        .route("/poll", get(poll_status))
        .route("/api/poll-status", get(poll_status))
        .route("/update", post(update_status))
        .route("/api/update-status", post(update_status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

/// Wire form of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: TaskStatus,
    pub version: u64,
    pub timestamp: DateTime<Utc>,
}

impl From<Snapshot<TaskStatus>> for StatusBody {
    fn from(snapshot: Snapshot<TaskStatus>) -> Self {
        Self {
            status: snapshot.value,
            version: snapshot.version,
            timestamp: snapshot.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PollParams {
    pub last_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub hub: HubStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("status is required")]
    MissingStatus,

    #[error("invalid status {0:?}")]
    InvalidStatus(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("server is shutting down")]
    ShuttingDown,
}

impl From<HeraldError> for ApiError {
    fn from(e: HeraldError) -> Self {
        match e {
            HeraldError::InvalidValue(value) => ApiError::InvalidStatus(value),
            HeraldError::MissingValue => ApiError::MissingStatus,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingStatus | ApiError::InvalidStatus(_) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

// ==================
// Handlers
// ==================

async fn get_status(State(state): State<AppState>) -> Json<StatusBody> {
    Json(state.hub.read().into())
}

/// Long poll: answer at once if the caller is behind, otherwise hold the
/// request until an update, the maximum wait, or shutdown
async fn poll_status(
    State(state): State<AppState>,
    params: Result<Query<PollParams>, QueryRejection>,
) -> Response {
    let raw = params.ok().and_then(|Query(p)| p.last_version);
    let baseline = parse_baseline(raw.as_deref());
    debug!(baseline, "poll");

    match state.hub.wait(baseline).await {
        Resolution::Fulfilled(snapshot) => Json(StatusBody::from(snapshot)).into_response(),
        Resolution::TimedOut => StatusCode::NO_CONTENT.into_response(),
        Resolution::Cancelled => ApiError::ShuttingDown.into_response(),
    }
}

async fn update_status(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<StatusBody>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let raw = request.status.ok_or(ApiError::MissingStatus)?;

    let published = state.hub.update_raw(&raw).map_err(|e| {
        debug!(error = %e, "update rejected");
        ApiError::from(e)
    })?;

    Ok(Json(published.snapshot.into()))
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        hub: state.hub.stats(),
    })
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
