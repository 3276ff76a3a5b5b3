//! The record produced by every probe.

use std::fmt;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Classification of a single probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// A well-formed response was received, whatever its status.
    Success,
    /// No response within the probe timeout.
    Timeout,
    /// Any other transport or protocol error.
    OtherFailure,
}

impl ResultKind {
    /// Numeric code written to outcome files.
    pub fn code(self) -> u8 {
        match self {
            ResultKind::Success => 0,
            ResultKind::Timeout => 1,
            ResultKind::OtherFailure => 2,
        }
    }

    /// Metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Success => "success",
            ResultKind::Timeout => "timeout",
            ResultKind::OtherFailure => "other_failure",
        }
    }

    pub fn is_success(self) -> bool {
        self == ResultKind::Success
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResultKind::Success => "SUCCESS",
            ResultKind::Timeout => "TIMEOUT",
            ResultKind::OtherFailure => "FAILURE",
        };
        f.pad(label)
    }
}

/// Immutable result of one probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Name of the probing node.
    pub source: String,
    /// Configured name of the probed destination.
    pub destination: String,
    pub result: ResultKind,
    /// Wall-clock time spent on the attempt.
    pub elapsed: Duration,
    /// When the attempt finished.
    pub observed_at: DateTime<Utc>,
}

impl Outcome {
    /// Elapsed time in fractional milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}
