//! Fixed-interval probe scheduling.
//!
//! # States
//! ```text
//! Initializing ──(all destinations resolved)──▶ Running ──(process killed)──▶ Terminated
//!      │
//!      └──(resolution failure)──▶ startup error, never Running
//! ```
//!
//! # Design Decisions
//! - One task per probe, fire and forget: the loop only waits on its timer
//! - Ticks overlap when probes outlast the interval; missed ticks are caught
//!   up, never skipped
//! - Probe failures are outcomes, they never leave the Running state
//! - Probes run concurrently, but a probe publishes only after the previous
//!   tick's probe for the same destination has published, so per-destination
//!   outcomes keep tick order. Destinations never wait on each other
//! - A zero interval is raised to one millisecond, since the timer cannot
//!   tick on a zero period

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};

use crate::check::bus::{Publisher, ResultBus};
use crate::check::destination::{resolve_all, Destination, ResolutionError};
use crate::check::probe::{ProbeConfig, Prober};
use crate::config::CheckConfig;
use crate::observers::Observer;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Repeatedly probes every destination.
pub struct Scheduler {
    destinations: Vec<Arc<Destination>>,
    source: Arc<str>,
    prober: Arc<Prober>,
    interval: Duration,
    channel_capacity: usize,
    /// Per destination, fires once the latest dispatched probe has published.
    published: Vec<Option<oneshot::Receiver<()>>>,
}

impl Scheduler {
    /// Resolve every configured host.
    ///
    /// Fails if any host cannot be resolved; the scheduler never runs with
    /// an unresolved destination.
    pub async fn initialize(config: &CheckConfig) -> Result<Self, ResolutionError> {
        tracing::debug!(hosts = config.hosts.len(), "Resolving destinations");

        let destinations = resolve_all(&config.hosts, config.port, config.resolve).await?;

        Ok(Self::with_destinations(
            destinations,
            config.source_name(),
            ProbeConfig::from(config),
            config.interval(),
            config.channel_capacity,
        ))
    }

    /// Build a scheduler from already resolved destinations.
    pub fn with_destinations(
        destinations: Vec<Destination>,
        source: impl Into<String>,
        probe: ProbeConfig,
        interval: Duration,
        channel_capacity: usize,
    ) -> Self {
        if interval < MIN_INTERVAL {
            tracing::warn!(
                interval_ms = MIN_INTERVAL.as_millis() as u64,
                "Probe interval below minimum, using minimum"
            );
        }

        let published = destinations.iter().map(|_| None).collect();

        Self {
            destinations: destinations.into_iter().map(Arc::new).collect(),
            source: Arc::from(source.into()),
            prober: Arc::new(Prober::new(probe)),
            interval: interval.max(MIN_INTERVAL),
            channel_capacity,
            published,
        }
    }

    pub fn destinations(&self) -> &[Arc<Destination>] {
        &self.destinations
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the bus and the observers, then probe forever.
    pub async fn run(mut self, observers: Vec<Box<dyn Observer>>) {
        let (mut bus, publisher) = ResultBus::new(self.channel_capacity);

        for observer in observers {
            let rx = bus.subscribe(observer.name());
            let name = observer.name();
            tokio::spawn(async move {
                observer.consume(rx).await;
                tracing::debug!(observer = name, "Observer finished");
            });
        }
        tokio::spawn(bus.run());

        tracing::info!(
            source = %self.source,
            destinations = self.destinations.len(),
            interval_ms = self.interval.as_millis() as u64,
            timeout_ms = self.prober.timeout().as_millis() as u64,
            "Scheduler running"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            ticker.tick().await;
            self.dispatch_tick(&publisher);
        }
    }

    /// Spawn one probe per destination without waiting for any of them.
    pub fn dispatch_tick(&mut self, publisher: &Publisher) {
        for (destination, published) in self.destinations.iter().zip(self.published.iter_mut()) {
            let destination = Arc::clone(destination);
            let source = Arc::clone(&self.source);
            let prober = Arc::clone(&self.prober);
            let publisher = publisher.clone();
            let (done, next) = oneshot::channel();
            let previous = published.replace(next);

            tokio::spawn(async move {
                let outcome = prober.probe(&destination, &source).await;
                if let Some(previous) = previous {
                    // Err means the previous task is gone; nothing left to wait for.
                    let _ = previous.await;
                }
                if publisher.publish(outcome).await.is_err() {
                    tracing::error!(destination = %destination.name(), "Result bus closed, outcome lost");
                }
                let _ = done.send(());
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_initialize_resolves_every_host() {
        let config = CheckConfig {
            hosts: vec!["127.0.0.1".into(), "localhost".into()],
            port: 9,
            source: Some("origin".into()),
            ..CheckConfig::default()
        };

        let scheduler = Scheduler::initialize(&config).await.unwrap();
        let names: Vec<_> = scheduler.destinations().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["127.0.0.1", "localhost"]);
        assert_eq!(scheduler.source(), "origin");
        assert_eq!(scheduler.interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_initialize_fails_on_unresolvable_host() {
        let config = CheckConfig {
            hosts: vec!["127.0.0.1".into(), "does-not-exist.invalid".into()],
            ..CheckConfig::default()
        };
        assert!(Scheduler::initialize(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_one_outcome_per_destination_per_tick() {
        let destinations = vec![
            Destination::new("a", "127.0.0.1", 9),
            Destination::new("b", "127.0.0.1", 9),
        ];
        let probe = ProbeConfig {
            timeout: Duration::from_millis(500),
            reuse_connections: false,
        };
        let mut scheduler = Scheduler::with_destinations(destinations, "me", probe, Duration::from_secs(1), 16);

        let (mut bus, publisher) = ResultBus::new(16);
        let mut rx = bus.subscribe("test");
        tokio::spawn(bus.run());

        for _ in 0..3 {
            scheduler.dispatch_tick(&publisher);
        }
        drop(publisher);

        let mut counts: HashMap<String, usize> = HashMap::new();
        while let Some(outcome) = rx.recv().await {
            assert_eq!(outcome.source, "me");
            *counts.entry(outcome.destination.clone()).or_default() += 1;
        }
        assert_eq!(counts.get("a"), Some(&3));
        assert_eq!(counts.get("b"), Some(&3));
    }

    #[tokio::test]
    async fn test_zero_interval_is_raised_to_minimum() {
        let probe = ProbeConfig {
            timeout: Duration::from_millis(100),
            reuse_connections: false,
        };
        let scheduler = Scheduler::with_destinations(Vec::new(), "me", probe, Duration::ZERO, 0);
        assert_eq!(scheduler.interval(), MIN_INTERVAL);

        // Runs without panicking on the timer or the bus channels.
        let task = tokio::spawn(scheduler.run(Vec::new()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());
        task.abort();
    }

    #[tokio::test]
    async fn test_slow_tick_is_published_before_next_tick() {
        // First connection answers after 400ms, later ones immediately.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut first = true;
            while let Ok((mut socket, _)) = listener.accept().await {
                let delay = if first { Duration::from_millis(400) } else { Duration::ZERO };
                first = false;
                tokio::spawn(async move {
                    use tokio::io::{AsyncReadExt, AsyncWriteExt};
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await;
                });
            }
        });

        let probe = ProbeConfig {
            timeout: Duration::from_secs(2),
            reuse_connections: false,
        };
        let destinations = vec![Destination::new("a", "127.0.0.1", addr.port())];
        let mut scheduler = Scheduler::with_destinations(destinations, "me", probe, Duration::from_secs(1), 16);

        let (mut bus, publisher) = ResultBus::new(16);
        let mut rx = bus.subscribe("test");
        tokio::spawn(bus.run());

        scheduler.dispatch_tick(&publisher);
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.dispatch_tick(&publisher);
        drop(publisher);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.elapsed >= Duration::from_millis(400), "tick 1 took {:?}", first.elapsed);
        assert!(second.elapsed < Duration::from_millis(400), "tick 2 took {:?}", second.elapsed);
        assert!(first.observed_at > second.observed_at);
        assert!(rx.recv().await.is_none());
    }
}
