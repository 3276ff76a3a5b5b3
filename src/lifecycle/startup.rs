//! Startup orchestration.
//!
//! # Order
//! 1. Resolve every destination (fatal on failure)
//! 2. Set up observers (fatal on failure)
//! 3. Bind the echo responder (fatal on failure)
//! 4. Run: serve, start bus and observers, probe forever
//!
//! Nothing is started until every step has succeeded, so a failed startup
//! produces no outcomes at all.

use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::check::{ResolutionError, Scheduler};
use crate::config::NetworkTestConfig;
use crate::http::EchoServer;
use crate::observers::{self, Observer, ObserverError};

/// Errors that abort the process before probing starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Observer(#[from] ObserverError),

    #[error("could not bind echo server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// A fully initialized node, ready to run.
pub struct Node {
    scheduler: Scheduler,
    observers: Vec<Box<dyn Observer>>,
    server: Option<(EchoServer, TcpListener)>,
}

impl Node {
    /// Perform every fallible startup step.
    pub async fn start(config: &NetworkTestConfig) -> Result<Self, StartupError> {
        let scheduler = Scheduler::initialize(&config.check).await?;
        let observers = observers::build(&config.observers).await?;

        let server = if config.server.enabled {
            let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.check.port));
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind { addr, source })?;
            Some((EchoServer::new(&config.server), listener))
        } else {
            None
        };

        Ok(Self {
            scheduler,
            observers,
            server,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run until the process is terminated.
    pub async fn run(self) {
        if let Some((server, listener)) = self.server {
            tokio::spawn(async move {
                if let Err(e) = server.run(listener).await {
                    tracing::error!(error = %e, "Echo server failed");
                }
            });
        }

        self.scheduler.run(self.observers).await;
    }
}
