//! Live Mutator
//!
//! Drives the aggregate statistics with a floored random walk on a fixed
//! cadence. The statistics live in a `watch` channel: the mutator is its only
//! writer, readers borrow the latest value or wait for changes.
//!
//! The task belongs to a `MutatorHandle`. Stopping or dropping the handle
//! cancels the task; no tick lands after that, including one that was
//! already pending.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::stats::AggregateStats;
use crate::market::RandomSource;
use crate::websocket::{ConnectionHub, WsEvent};

/// Default cadence of the random walk
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(3000);

/// Shared, observable aggregate statistics
#[derive(Clone)]
pub struct StatsFeed {
    tx: Arc<watch::Sender<AggregateStats>>,
}

impl StatsFeed {
    pub fn new(initial: AggregateStats) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Latest statistics
    pub fn current(&self) -> AggregateStats {
        *self.tx.borrow()
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<AggregateStats> {
        self.tx.subscribe()
    }

    /// Mutate in place and notify receivers; returns the new value
    pub(crate) fn update(&self, modify: impl FnOnce(&mut AggregateStats)) -> AggregateStats {
        self.tx.send_modify(modify);
        self.current()
    }
}

impl Default for StatsFeed {
    fn default() -> Self {
        Self::new(AggregateStats::default())
    }
}

/// Periodic random walk over a `StatsFeed`
pub struct LiveMutator {
    feed: StatsFeed,
    rng: Box<dyn RandomSource>,
    interval: Duration,
    hub: Option<ConnectionHub>,
}

impl LiveMutator {
    pub fn new(feed: StatsFeed, rng: Box<dyn RandomSource>) -> Self {
        Self {
            feed,
            rng,
            interval: DEFAULT_TICK_INTERVAL,
            hub: None,
        }
    }

    /// Builder method: set the tick cadence
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Builder method: publish every tick on the `stats` topic
    pub fn hub(mut self, hub: ConnectionHub) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Spawn the walk; the first tick lands one interval from now
    pub fn start(self) -> MutatorHandle {
        let LiveMutator {
            feed,
            mut rng,
            interval,
            hub,
        } = self;

        let ticks = Arc::new(AtomicU64::new(0));
        let tick_counter = Arc::clone(&ticks);

        tracing::info!(interval_ms = interval.as_millis() as u64, "Starting live mutator");

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let stats = feed.update(|stats| {
                    stats.tick(rng.as_mut());
                });
                let tick = tick_counter.fetch_add(1, Ordering::SeqCst) + 1;

                tracing::trace!(
                    tick,
                    total_volume = stats.total_volume,
                    active_convergences = stats.active_convergences,
                    avg_spread = stats.avg_spread,
                    "Mutator tick"
                );

                if let Some(hub) = &hub {
                    hub.publish(WsEvent::stats(&stats, Utc::now().timestamp_millis()));
                }
            }
        });

        MutatorHandle {
            task: Some(task),
            ticks,
        }
    }
}

/// Owner of a running mutator task
///
/// Dropping the handle cancels the task.
pub struct MutatorHandle {
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl MutatorHandle {
    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Cancel the task and wait until it has fully stopped
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::info!(ticks = self.ticks(), "Live mutator stopped");
        }
    }
}

impl Drop for MutatorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
