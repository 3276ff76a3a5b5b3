//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count probe outcomes per source, destination and result
//! - Accumulate probe time per source, destination and result
//! - Expose a Prometheus-compatible `/metrics` endpoint
//!
//! # Metrics
//! - `networktest_probes_total` (counter): outcomes by source, destination, result
//! - `networktest_probe_elapsed_microseconds_total` (counter): summed probe time
//!
//! # Design Decisions
//! - The recorder is owned by the observer rather than installed globally,
//!   so several exporters (or tests) can coexist in one process
//! - The listener is bound at setup so a taken port fails startup

use std::net::SocketAddr;
use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tokio::net::TcpListener;

use crate::check::{Outcome, OutcomeReceiver};
use crate::observers::{Observer, ObserverError};

pub const PROBES_TOTAL: &str = "networktest_probes_total";
pub const ELAPSED_TOTAL: &str = "networktest_probe_elapsed_microseconds_total";

/// Counts outcomes and serves them for scraping.
pub struct MetricsExporter {
    listener: TcpListener,
    recorder: PrometheusRecorder,
}

impl MetricsExporter {
    /// Bind the scrape endpoint.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ObserverError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ObserverError::Bind { addr, source })?;
        let recorder = PrometheusBuilder::new().build_recorder();

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_counter!(PROBES_TOTAL, "Total number of probe attempts.");
            metrics::describe_counter!(
                ELAPSED_TOTAL,
                metrics::Unit::Microseconds,
                "Total time spent in probe attempts."
            );
        });

        Ok(Self { listener, recorder })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle rendering the current metric values.
    pub fn handle(&self) -> PrometheusHandle {
        self.recorder.handle()
    }
}

/// Record one outcome against the current recorder.
pub fn record_outcome(outcome: &Outcome) {
    let labels = [
        ("source", outcome.source.clone()),
        ("destination", outcome.destination.clone()),
        ("result", outcome.result.as_str().to_string()),
    ];

    metrics::counter!(PROBES_TOTAL, &labels).increment(1);
    metrics::counter!(ELAPSED_TOTAL, &labels).increment(outcome.elapsed.as_micros() as u64);
}

async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

#[async_trait]
impl Observer for MetricsExporter {
    fn name(&self) -> &'static str {
        "metrics"
    }

    async fn consume(self: Box<Self>, mut outcomes: OutcomeReceiver) {
        let MetricsExporter { listener, recorder } = *self;

        let app = Router::new()
            .route("/metrics", get(render))
            .with_state(recorder.handle());

        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "Metrics endpoint listening"),
            Err(e) => tracing::warn!(error = %e, "Metrics endpoint address unknown"),
        }
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Metrics endpoint stopped");
            }
        });

        while let Some(outcome) = outcomes.recv().await {
            metrics::with_local_recorder(&recorder, || record_outcome(&outcome));
        }
    }
}
