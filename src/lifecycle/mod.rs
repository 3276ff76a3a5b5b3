//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve destinations → Set up observers → Bind echo server → Run
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → process exits, no drain
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No graceful shutdown: termination is the only cancellation

pub mod signals;
pub mod startup;

pub use startup::{Node, StartupError};
