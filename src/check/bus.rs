//! Fan-out of outcomes to observers.
//!
//! # Data Flow
//! ```text
//! probe tasks ──publish──▶ inbox (bounded mpsc) ──▶ dispatcher task
//!                                                      │
//!                        ┌─────────────────────────────┼──────────────────────┐
//!                        ▼                             ▼                      ▼
//!                observer channel 1            observer channel 2      observer channel N
//!                 (bounded mpsc)                (bounded mpsc)          (bounded mpsc)
//! ```
//!
//! # Design Decisions
//! - Observers are registered before the bus starts; `run` consumes the bus,
//!   so the registry cannot change afterwards
//! - A single dispatcher forwards outcomes, so every observer sees the same order
//! - Full channels block (no drops): a stalled observer first stalls the
//!   dispatcher, then fills the inbox, and finally makes `publish` wait. Other
//!   observers still receive everything already dispatched, but a wedged
//!   observer can eventually throttle the whole system
//! - An observer whose receiver is gone is unregistered and delivery to the
//!   remaining observers continues

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::check::outcome::Outcome;

/// Receiving end handed to an observer.
pub type OutcomeReceiver = mpsc::Receiver<Arc<Outcome>>;

/// The bus dispatcher is no longer running.
#[derive(Debug, Error)]
#[error("result bus closed")]
pub struct BusClosed;

struct Subscriber {
    name: String,
    tx: mpsc::Sender<Arc<Outcome>>,
}

/// Dispatcher side of the bus.
pub struct ResultBus {
    inbox: mpsc::Receiver<Outcome>,
    subscribers: Vec<Subscriber>,
    capacity: usize,
}

/// Producer side of the bus. Cloned into every probe task.
#[derive(Clone)]
pub struct Publisher {
    tx: mpsc::Sender<Outcome>,
}

impl ResultBus {
    /// Create a bus whose inbox and observer channels hold `capacity` outcomes each.
    pub fn new(capacity: usize) -> (Self, Publisher) {
        let capacity = capacity.max(1);
        let (tx, inbox) = mpsc::channel(capacity);

        let bus = Self {
            inbox,
            subscribers: Vec::new(),
            capacity,
        };
        (bus, Publisher { tx })
    }

    /// Register an observer and return its private channel.
    pub fn subscribe(&mut self, name: impl Into<String>) -> OutcomeReceiver {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.push(Subscriber {
            name: name.into(),
            tx,
        });
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Forward outcomes until every publisher is dropped.
    ///
    /// Dropping the bus afterwards closes every observer channel.
    pub async fn run(mut self) {
        tracing::debug!(subscribers = self.subscribers.len(), "Result bus started");

        while let Some(outcome) = self.inbox.recv().await {
            self.dispatch(Arc::new(outcome)).await;
        }

        tracing::debug!("All publishers dropped, result bus stopping");
    }

    async fn dispatch(&mut self, outcome: Arc<Outcome>) {
        let mut lost = false;

        for subscriber in &self.subscribers {
            if subscriber.tx.send(Arc::clone(&outcome)).await.is_err() {
                tracing::warn!(observer = %subscriber.name, "Observer stopped, unregistering it");
                lost = true;
            }
        }

        if lost {
            self.subscribers.retain(|s| !s.tx.is_closed());
        }
    }
}

impl Publisher {
    /// Hand an outcome to the bus, waiting while the inbox is full.
    pub async fn publish(&self, outcome: Outcome) -> Result<(), BusClosed> {
        self.tx.send(outcome).await.map_err(|_| BusClosed)
    }
}
