//! networktest
//!
//! Probes a set of nodes over HTTP at a fixed interval and reports every
//! outcome to the enabled observers. Each node also runs an echo responder
//! so that it can be probed in turn.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                             NETWORKTEST                              │
//!   │                                                                      │
//!   │  ┌───────────┐ per tick  ┌────────┐  Outcome  ┌────────────┐         │
//!   │  │ scheduler │──────────▶│ probe  │──────────▶│ result bus │         │
//!   │  └───────────┘ 1 task /  └───┬────┘           └─────┬──────┘         │
//!   │                destination   │ GET /                │ fan-out        │
//!   │                              ▼                      ▼                │
//!   │                       remote echo           ┌──────────────────┐     │
//!   │                        responder            │ verbose │ summary│     │
//!   │                                             │ file    │ metrics│     │
//!   │  ┌──────────────┐                           └──────────────────┘     │
//!   │  │ echo server  │◀──── probes from other nodes                       │
//!   │  └──────────────┘                                                    │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use networktest::cli::Cli;
use networktest::lifecycle::{signals, Node};
use networktest::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        hosts = ?config.check.hosts,
        port = config.check.port,
        interval_ms = config.check.interval_ms,
        timeout_ms = config.check.timeout_ms,
        resolve = config.check.resolve,
        "Configuration loaded"
    );

    let node = match Node::start(&config).await {
        Ok(node) => node,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    tokio::select! {
        _ = node.run() => {}
        _ = signals::terminate() => {}
    }

    tracing::info!("Exiting");
    Ok(())
}
