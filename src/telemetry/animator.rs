//! Display Animators
//!
//! One task per displayed headline value. It follows its metric in a
//! `StatsFeed` and eases the displayed number toward each new value with a
//! `SmoothedValue`, stepping on a fast cadence while unsettled.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::smoothing::SmoothedValue;
use super::stats::{AggregateStats, StatMetric};
use crate::websocket::{ConnectionHub, WsEvent};

/// Default cadence of a smoothing step
pub const DEFAULT_SMOOTHING_INTERVAL: Duration = Duration::from_millis(50);

/// Smoothing task for one metric
pub struct DisplayAnimator {
    metric: StatMetric,
    source: watch::Receiver<AggregateStats>,
    interval: Duration,
    hub: Option<ConnectionHub>,
}

impl DisplayAnimator {
    pub fn new(metric: StatMetric, source: watch::Receiver<AggregateStats>) -> Self {
        Self {
            metric,
            source,
            interval: DEFAULT_SMOOTHING_INTERVAL,
            hub: None,
        }
    }

    /// Builder method: set the step cadence
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Builder method: publish every step on `display.{metric}`
    pub fn hub(mut self, hub: ConnectionHub) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Spawn the smoothing task, starting settled at the current value
    pub fn spawn(self) -> AnimatorHandle {
        let DisplayAnimator {
            metric,
            mut source,
            interval,
            hub,
        } = self;

        let initial = source.borrow_and_update().metric(metric);
        let (value_tx, value_rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut smoothed = SmoothedValue::new(initial);
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = source.changed() => {
                        if changed.is_err() {
                            tracing::debug!(metric = %metric, "Stats feed closed, animator exiting");
                            break;
                        }
                        let target = source.borrow_and_update().metric(metric);
                        smoothed.set_target(target);
                        // A new target restarts the cadence
                        ticker.reset();
                    }
                    _ = ticker.tick(), if !smoothed.is_settled() => {
                        let value = smoothed.step();
                        value_tx.send_replace(value);
                        if let Some(hub) = &hub {
                            hub.publish(WsEvent::display(metric, value));
                        }
                    }
                }
            }
        });

        AnimatorHandle {
            metric,
            value: value_rx,
            task: Some(task),
        }
    }
}

/// Owner of a running animator task
///
/// Dropping the handle cancels the task.
pub struct AnimatorHandle {
    metric: StatMetric,
    value: watch::Receiver<f64>,
    task: Option<JoinHandle<()>>,
}

impl AnimatorHandle {
    pub fn metric(&self) -> StatMetric {
        self.metric
    }

    /// Currently displayed value
    pub fn current(&self) -> f64 {
        *self.value.borrow()
    }

    /// Receiver of the displayed value
    pub fn watch(&self) -> watch::Receiver<f64> {
        self.value.clone()
    }

    /// Cancel the task and wait until it has fully stopped
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for AnimatorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn one animator per headline metric
pub fn spawn_all(
    source: &watch::Receiver<AggregateStats>,
    interval: Duration,
    hub: Option<ConnectionHub>,
) -> Vec<AnimatorHandle> {
    StatMetric::all()
        .iter()
        .map(|metric| {
            let mut animator = DisplayAnimator::new(*metric, source.clone()).interval(interval);
            if let Some(hub) = &hub {
                animator = animator.hub(hub.clone());
            }
            animator.spawn()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::mutator::StatsFeed;
    use crate::websocket::HubConfig;

    #[tokio::test(start_paused = true)]
    async fn test_starts_settled() {
        let feed = StatsFeed::default();
        let handle = DisplayAnimator::new(StatMetric::TotalVolume, feed.subscribe()).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.current(), 847.3);
        assert_eq!(handle.metric(), StatMetric::TotalVolume);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_eases_toward_new_value() {
        let feed = StatsFeed::default();
        let handle = DisplayAnimator::new(StatMetric::AvgSpread, feed.subscribe()).spawn();

        feed.update(|s| s.avg_spread = 22.4);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!((handle.current() - 13.4).abs() < 1e-9);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.current(), 22.4);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_displayed_value() {
        let feed = StatsFeed::default();
        let handle =
            DisplayAnimator::new(StatMetric::ActiveConvergences, feed.subscribe()).spawn();
        let value = handle.watch();

        handle.stop().await;
        feed.update(|s| s.active_convergences = 300);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(*value.borrow(), 156.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_all_publishes_display_events() {
        let hub = ConnectionHub::new(HubConfig::default());
        let mut events = hub.subscribe_events();
        let feed = StatsFeed::default();

        let handles = spawn_all(&feed.subscribe(), DEFAULT_SMOOTHING_INTERVAL, Some(hub.clone()));
        assert_eq!(handles.len(), 3);

        feed.update(|s| s.total_volume = 900.0);

        let event = events.recv().await.unwrap();
        assert_eq!(event.topic, "display.total_volume");

        for handle in handles {
            handle.stop().await;
        }
    }
}
