//! Probe destinations and their one-time resolution.

use std::net::IpAddr;
use thiserror::Error;
use tokio::net::lookup_host;

/// A destination name could not be turned into an address.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed to resolve host {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no address for host {0}")]
    NoAddress(String),
}

/// Where a probe connects to.
///
/// `name` is the configured identifier used in every report; `address` is
/// what the connection actually targets. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    name: String,
    address: String,
    port: u16,
}

impl Destination {
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port,
        }
    }

    /// Look the name up and build a destination for it.
    ///
    /// The lookup always runs so that an unknown name is rejected at startup.
    /// With `pre_resolve` the first returned address replaces the name for
    /// connection attempts; otherwise the name is kept and resolved again by
    /// every connection.
    pub async fn resolve(name: &str, port: u16, pre_resolve: bool) -> Result<Self, ResolutionError> {
        let mut addrs = lookup_host((name, port))
            .await
            .map_err(|source| ResolutionError::Lookup {
                host: name.to_string(),
                source,
            })?;

        let first = addrs
            .next()
            .ok_or_else(|| ResolutionError::NoAddress(name.to_string()))?;

        let address = if pre_resolve {
            tracing::info!(host = %name, address = %first.ip(), "Resolved host");
            first.ip().to_string()
        } else {
            name.to_string()
        };

        Ok(Self::new(name, address, port))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// URL requested by a probe.
    pub fn url(&self) -> String {
        match self.address.parse::<IpAddr>() {
            Ok(IpAddr::V6(v6)) => format!("http://[{}]:{}/", v6, self.port),
            _ => format!("http://{}:{}/", self.address, self.port),
        }
    }
}

/// Resolve every configured host, failing on the first one that cannot be resolved.
pub async fn resolve_all(
    hosts: &[String],
    port: u16,
    pre_resolve: bool,
) -> Result<Vec<Destination>, ResolutionError> {
    let mut destinations = Vec::with_capacity(hosts.len());
    for host in hosts {
        destinations.push(Destination::resolve(host, port, pre_resolve).await?);
    }
    Ok(destinations)
}
