//! Reachability checking core.
//!
//! # Data Flow
//! ```text
//! Scheduler (scheduler.rs)
//!     → every interval, one task per destination
//!     → Prober (probe.rs) performs GET / with timeout
//!     → Outcome (outcome.rs) classified as success / timeout / other failure
//!     → ResultBus (bus.rs) copies it to every observer channel
//! ```
//!
//! # Design Decisions
//! - Destinations are resolved once and shared read-only
//! - Probes, bus and observers only communicate through channels
//! - No cancellation: in-flight probes finish or the process dies
//! - Per destination, outcomes reach observers in tick order even when
//!   ticks overlap; across destinations they arrive as probes complete

pub mod bus;
pub mod destination;
pub mod outcome;
pub mod probe;
pub mod scheduler;

pub use bus::{OutcomeReceiver, Publisher, ResultBus};
pub use destination::{Destination, ResolutionError};
pub use outcome::{Outcome, ResultKind};
pub use probe::{ProbeConfig, Prober};
pub use scheduler::Scheduler;
