// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the herald daemon

use std::time::Duration;

use herald_core::{HubStats, TaskStatus};
use herald_daemon::{ErrorBody, StatusBody};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use ureq::http::StatusCode;
use ureq::Agent;

/// Server used when neither `--server` nor `HERALD_SERVER` is given
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Per-request timeout; a little longer than the server's default hold
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server is shutting down")]
    ShuttingDown,

    #[error("Unexpected response status {0}")]
    UnexpectedStatus(u16),
}

impl ClientError {
    /// True when the server could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport {
                source: ureq::Error::ConnectionFailed
                    | ureq::Error::HostNotFound
                    | ureq::Error::Io(_),
                ..
            }
        )
    }
}

/// Outcome of one long poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A version newer than the baseline
    Update(StatusBody),
    /// The server's hold expired without a change
    NoChange,
}

/// Body of `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub hub: HubStats,
}

#[derive(Serialize)]
struct UpdateBody {
    status: TaskStatus,
}

/// Blocking client for one daemon
#[derive(Clone)]
pub struct HeraldClient {
    agent: Agent,
    base: String,
}

impl HeraldClient {
    pub fn new(server: &str) -> Self {
        Self::with_timeout(server, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base: server.trim_end_matches('/').to_string(),
        }
    }

    pub fn server(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Current status without waiting
    pub fn status(&self) -> Result<StatusBody, ClientError> {
        let url = self.url("/api/status");
        debug!(%url, "GET");
        let mut response = self.agent.get(&url).call().map_err(transport(&url))?;
        match response.status() {
            StatusCode::OK => response
                .body_mut()
                .read_json::<StatusBody>()
                .map_err(transport(&url)),
            other => Err(rejected(other, &mut response)),
        }
    }

    /// Wait for a version newer than `since`
    pub fn poll(&self, since: u64) -> Result<PollOutcome, ClientError> {
        let url = self.url("/api/poll-status");
        debug!(%url, since, "long poll");
        let mut response = self
            .agent
            .get(&url)
            .query("last_version", since.to_string())
            .call()
            .map_err(transport(&url))?;
        match response.status() {
            StatusCode::OK => response
                .body_mut()
                .read_json::<StatusBody>()
                .map(PollOutcome::Update)
                .map_err(transport(&url)),
            StatusCode::NO_CONTENT => Ok(PollOutcome::NoChange),
            other => Err(rejected(other, &mut response)),
        }
    }

    /// Publish a new status
    pub fn update(&self, status: TaskStatus) -> Result<StatusBody, ClientError> {
        let url = self.url("/api/update-status");
        debug!(%url, %status, "POST");
        let mut response = self
            .agent
            .post(&url)
            .send_json(UpdateBody { status })
            .map_err(transport(&url))?;
        match response.status() {
            StatusCode::OK => response
                .body_mut()
                .read_json::<StatusBody>()
                .map_err(transport(&url)),
            other => Err(rejected(other, &mut response)),
        }
    }

    pub fn health(&self) -> Result<HealthReport, ClientError> {
        let url = self.url("/health");
        debug!(%url, "GET");
        let mut response = self.agent.get(&url).call().map_err(transport(&url))?;
        match response.status() {
            StatusCode::OK => response
                .body_mut()
                .read_json::<HealthReport>()
                .map_err(transport(&url)),
            other => Err(rejected(other, &mut response)),
        }
    }
}

fn transport(url: &str) -> impl FnOnce(ureq::Error) -> ClientError + '_ {
    move |source| ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

fn rejected(status: StatusCode, response: &mut ureq::http::Response<ureq::Body>) -> ClientError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => ClientError::ShuttingDown,
        status if status.is_client_error() => {
            let message = response
                .body_mut()
                .read_json::<ErrorBody>()
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            ClientError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
        status => ClientError::UnexpectedStatus(status.as_u16()),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
