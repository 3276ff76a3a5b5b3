//! Per-outcome log lines.

use async_trait::async_trait;

use crate::check::OutcomeReceiver;
use crate::observers::Observer;

/// Logs every outcome as it arrives.
#[derive(Debug, Default)]
pub struct VerboseLogger;

impl VerboseLogger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observer for VerboseLogger {
    fn name(&self) -> &'static str {
        "verbose"
    }

    async fn consume(self: Box<Self>, mut outcomes: OutcomeReceiver) {
        while let Some(outcome) = outcomes.recv().await {
            tracing::info!(
                source = %outcome.source,
                destination = %outcome.destination,
                result = outcome.result.as_str(),
                elapsed_ms = outcome.elapsed_ms(),
                "{:>10} <-> {:<10} {} in {:.1} ms",
                outcome.source,
                outcome.destination,
                outcome.result,
                outcome.elapsed_ms()
            );
        }
    }
}
