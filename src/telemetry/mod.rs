//! Live Telemetry
//!
//! Simulated live feed for the headline statistics:
//!
//! - **stats**: The aggregate scalars and their floored random walk
//! - **smoothing**: Exponential easing of a displayed value toward a target
//! - **mutator**: Timer task driving the random walk
//! - **animator**: Timer tasks easing each displayed value
//!
//! # Example
//!
//! ```rust,no_run
//! use clairon::market::RngSource;
//! use clairon::telemetry::{LiveMutator, StatsFeed};
//!
//! #[tokio::main]
//! async fn main() {
//!     let feed = StatsFeed::default();
//!     let handle = LiveMutator::new(feed.clone(), Box::new(RngSource::from_entropy())).start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     println!("{:?}", feed.current());
//!
//!     handle.stop().await;
//! }
//! ```

pub mod animator;
pub mod mutator;
pub mod smoothing;
pub mod stats;

pub use animator::{spawn_all, AnimatorHandle, DisplayAnimator, DEFAULT_SMOOTHING_INTERVAL};
pub use mutator::{LiveMutator, MutatorHandle, StatsFeed, DEFAULT_TICK_INTERVAL};
pub use smoothing::SmoothedValue;
pub use stats::{
    AggregateStats, StatMetric, StatsDisplay, StatsStep, CONVERGENCE_FLOOR, SPREAD_FLOOR,
};
