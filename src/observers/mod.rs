//! Outcome consumers.
//!
//! # Data Flow
//! ```text
//! ResultBus → private channel per observer
//!     → verbose.rs (one log line per outcome)
//!     → summary.rs (periodic failure counts per destination)
//!     → file.rs (append-only record file)
//!     → metrics.rs (Prometheus counters + /metrics endpoint)
//! ```
//!
//! # Design Decisions
//! - Observers own their receiver and run until it closes
//! - Outcomes are shared read-only; aggregate state stays private to each observer
//! - Setup errors (unopenable file, unbindable port) abort startup instead of
//!   running with fewer observers than configured

use std::net::SocketAddr;
use async_trait::async_trait;
use thiserror::Error;

use crate::check::OutcomeReceiver;
use crate::config::ObserversConfig;

pub mod file;
pub mod metrics;
pub mod summary;
pub mod verbose;
#[cfg(test)]
pub(crate) mod testing;

pub use file::FileWriter;
pub use metrics::MetricsExporter;
pub use summary::SummaryLogger;
pub use verbose::VerboseLogger;

/// An observer could not be set up.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("could not open output file {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address '{0}'")]
    InvalidAddress(String),

    #[error("could not bind metrics endpoint {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// A long-running consumer of the outcome stream.
#[async_trait]
pub trait Observer: Send + 'static {
    /// Name used when registering with the bus and in logs.
    fn name(&self) -> &'static str;

    /// Consume outcomes until the channel closes.
    async fn consume(self: Box<Self>, outcomes: OutcomeReceiver);
}

/// Build every enabled observer.
pub async fn build(config: &ObserversConfig) -> Result<Vec<Box<dyn Observer>>, ObserverError> {
    let mut observers: Vec<Box<dyn Observer>> = Vec::new();

    if config.verbose.enabled {
        observers.push(Box::new(VerboseLogger::new()));
    }
    if config.summary.enabled {
        observers.push(Box::new(SummaryLogger::new(std::time::Duration::from_secs(
            config.summary.interval_secs,
        ))));
    }
    if config.file.enabled {
        observers.push(Box::new(FileWriter::open(&config.file.path, config.file.format)?));
    }
    if config.metrics.enabled {
        let addr: SocketAddr = config
            .metrics
            .bind_address
            .parse()
            .map_err(|_| ObserverError::InvalidAddress(config.metrics.bind_address.clone()))?;
        observers.push(Box::new(MetricsExporter::bind(addr).await?));
    }

    let names: Vec<_> = observers.iter().map(|o| o.name()).collect();
    tracing::info!(observers = ?names, "Observers ready");

    Ok(observers)
}
