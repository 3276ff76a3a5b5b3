//! Continuous reachability testing between nodes.

pub mod check;
pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod observers;

pub use check::{Outcome, ResultKind, Scheduler};
pub use config::NetworkTestConfig;
pub use lifecycle::Node;
