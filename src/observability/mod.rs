//! Observability subsystem.
//!
//! Process-level logging only; probe outcomes are reported through the
//! observers, including the metrics exporter.

pub mod logging;
