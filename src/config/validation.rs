//! Configuration validation.
//!
//! Serde handles syntax; this pass checks value ranges and cross-field
//! requirements, and reports every problem found rather than only the first.

use std::net::SocketAddr;
use thiserror::Error;
use crate::config::schema::NetworkTestConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no hosts configured")]
    NoHosts,

    #[error("host entry {0} is empty")]
    EmptyHost(usize),

    #[error("port must be non-zero")]
    ZeroPort,

    #[error("check interval must be greater than zero")]
    ZeroInterval,

    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,

    #[error("channel capacity must be greater than zero")]
    ZeroChannelCapacity,

    #[error("summary interval must be greater than zero")]
    ZeroSummaryInterval,

    #[error("file observer enabled without a path")]
    EmptyFilePath,

    #[error("invalid metrics bind address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &NetworkTestConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let check = &config.check;

    if check.hosts.is_empty() {
        errors.push(ValidationError::NoHosts);
    }
    for (i, host) in check.hosts.iter().enumerate() {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost(i));
        }
    }
    if check.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if check.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if check.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if check.channel_capacity == 0 {
        errors.push(ValidationError::ZeroChannelCapacity);
    }

    let observers = &config.observers;
    if observers.summary.enabled && observers.summary.interval_secs == 0 {
        errors.push(ValidationError::ZeroSummaryInterval);
    }
    if observers.file.enabled && observers.file.path.trim().is_empty() {
        errors.push(ValidationError::EmptyFilePath);
    }
    if observers.metrics.enabled
        && observers.metrics.bind_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observers.metrics.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
