//! A single reachability attempt.
//!
//! # Responsibilities
//! - Issue one `GET /` against a destination
//! - Enforce the run-wide probe timeout
//! - Classify the attempt as success, timeout or other failure
//!
//! # Design Decisions
//! - Connection reuse is a setting of the prober, off by default, so every
//!   probe exercises connection setup end to end
//! - Any response counts as success; status and body are not inspected
//! - Failures are data: `probe` never returns an error

use std::time::{Duration, Instant};
use axum::body::Body;
use axum::http::{header, Method, Request};
use chrono::Utc;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::time::{self, error::Elapsed};

use crate::check::destination::Destination;
use crate::check::outcome::{Outcome, ResultKind};
use crate::config::CheckConfig;

const USER_AGENT: &str = concat!("networktest/", env!("CARGO_PKG_VERSION"));

/// Connection settings shared by every probe of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Hard limit on a single attempt.
    pub timeout: Duration,
    /// Keep idle connections around for later probes.
    pub reuse_connections: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            reuse_connections: false,
        }
    }
}

impl From<&CheckConfig> for ProbeConfig {
    fn from(config: &CheckConfig) -> Self {
        Self {
            timeout: config.timeout(),
            reuse_connections: config.reuse_connections,
        }
    }
}

/// Issues probes. Cheap to share behind an `Arc`; holds no per-probe state.
#[derive(Clone)]
pub struct Prober {
    client: Client<HttpConnector, Body>,
    config: ProbeConfig,
}

impl Prober {
    pub fn new(config: ProbeConfig) -> Self {
        let mut builder = Client::builder(TokioExecutor::new());
        if !config.reuse_connections {
            builder.pool_max_idle_per_host(0);
        }
        let client = builder.build(HttpConnector::new());

        Self { client, config }
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Probe `destination` once, reporting `source` as the origin.
    pub async fn probe(&self, destination: &Destination, source: &str) -> Outcome {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(destination.url())
            .header(header::USER_AGENT, USER_AGENT);
        if !self.config.reuse_connections {
            request = request.header(header::CONNECTION, "close");
        }

        let start = Instant::now();
        let result = match request.body(Body::empty()) {
            Ok(request) => {
                let attempt = time::timeout(self.config.timeout, self.client.request(request)).await;
                classify(attempt, destination)
            }
            Err(e) => {
                tracing::warn!(destination = %destination.name(), error = %e, "Failed to build probe request");
                ResultKind::OtherFailure
            }
        };
        let elapsed = start.elapsed();

        Outcome {
            source: source.to_string(),
            destination: destination.name().to_string(),
            result,
            elapsed,
            observed_at: Utc::now(),
        }
    }
}

fn classify<T, E: std::fmt::Display>(
    attempt: Result<Result<T, E>, Elapsed>,
    destination: &Destination,
) -> ResultKind {
    match attempt {
        Ok(Ok(_)) => ResultKind::Success,
        Ok(Err(e)) => {
            tracing::debug!(destination = %destination.name(), error = %e, "Probe failed");
            ResultKind::OtherFailure
        }
        Err(_) => {
            tracing::debug!(destination = %destination.name(), "Probe timed out");
            ResultKind::Timeout
        }
    }
}
