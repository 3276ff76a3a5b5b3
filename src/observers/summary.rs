//! Periodic failure summaries.
//!
//! Counts are cumulative for the observer's lifetime. A summary is emitted on
//! the first outcome that arrives once the interval has elapsed, so nothing is
//! logged while no outcomes flow.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use async_trait::async_trait;

use crate::check::{Outcome, OutcomeReceiver};
use crate::observers::Observer;

/// Attempt counts for one destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: u64,
    pub failed: u64,
}

/// Aggregation behind [`SummaryLogger`], kept separate from the receive loop.
#[derive(Debug)]
pub struct Summary {
    tallies: BTreeMap<String, Tally>,
    interval: Duration,
    last_report: Instant,
}

impl Summary {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            tallies: BTreeMap::new(),
            interval,
            last_report: now,
        }
    }

    /// Count an outcome. Returns the report lines when a summary is due.
    pub fn record(&mut self, outcome: &Outcome, now: Instant) -> Option<Vec<String>> {
        let tally = self.tallies.entry(outcome.destination.clone()).or_default();
        tally.total += 1;
        if !outcome.result.is_success() {
            tally.failed += 1;
        }

        if now.duration_since(self.last_report) < self.interval {
            return None;
        }
        self.last_report = now;

        Some(
            self.tallies
                .iter()
                .map(|(dest, t)| format!("{} {}/{} failures", dest, t.failed, t.total))
                .collect(),
        )
    }

    pub fn tally(&self, destination: &str) -> Option<Tally> {
        self.tallies.get(destination).copied()
    }
}

/// Logs per-destination failure counts at most once per interval.
#[derive(Debug)]
pub struct SummaryLogger {
    interval: Duration,
}

impl SummaryLogger {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Observer for SummaryLogger {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn consume(self: Box<Self>, mut outcomes: OutcomeReceiver) {
        let mut summary = Summary::new(self.interval, Instant::now());

        while let Some(outcome) = outcomes.recv().await {
            if let Some(lines) = summary.record(&outcome, Instant::now()) {
                for line in lines {
                    tracing::info!("{}", line);
                }
            }
        }
    }
}
