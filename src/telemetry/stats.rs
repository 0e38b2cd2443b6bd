//! Aggregate Statistics
//!
//! The three headline scalars of the reactor panel and their floored
//! random walk.

use serde::{Deserialize, Serialize};

use crate::market::RandomSource;

/// Lower bound of the active convergence count
pub const CONVERGENCE_FLOOR: i64 = 100;

/// Lower bound of the average spread, in percent
pub const SPREAD_FLOOR: f64 = 5.0;

/// Headline statistics, mutated only by the live mutator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    /// 24h volume in millions
    pub total_volume: f64,
    pub active_convergences: i64,
    /// Percent
    pub avg_spread: f64,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            total_volume: 847.3,
            active_convergences: 156,
            avg_spread: 12.4,
        }
    }
}

/// One tick's worth of random-walk deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsStep {
    pub volume_delta: f64,
    pub convergence_delta: i64,
    pub spread_delta: f64,
}

impl StatsStep {
    /// Draw a step: volume biased upward, convergences in [-2, 2], spread in [-0.25, 0.25)
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let volume_delta = (rng.next_f64() - 0.3) * 2.0;
        let convergence_delta = rng.floor_scaled(5.0, -2.0);
        let spread_delta = (rng.next_f64() - 0.5) * 0.5;

        Self {
            volume_delta,
            convergence_delta,
            spread_delta,
        }
    }
}

impl AggregateStats {
    pub fn new(total_volume: f64, active_convergences: i64, avg_spread: f64) -> Self {
        Self {
            total_volume,
            active_convergences: active_convergences.max(CONVERGENCE_FLOOR),
            avg_spread: avg_spread.max(SPREAD_FLOOR),
        }
    }

    /// Apply a step, enforcing the floors
    pub fn apply(&mut self, step: StatsStep) {
        self.total_volume += step.volume_delta;
        self.active_convergences =
            (self.active_convergences + step.convergence_delta).max(CONVERGENCE_FLOOR);
        self.avg_spread = (self.avg_spread + step.spread_delta).max(SPREAD_FLOOR);
    }

    /// Draw and apply one random-walk step
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> StatsStep {
        let step = StatsStep::draw(rng);
        self.apply(step);
        step
    }

    /// Read a metric by its feed name
    pub fn metric(&self, metric: StatMetric) -> f64 {
        match metric {
            StatMetric::TotalVolume => self.total_volume,
            StatMetric::ActiveConvergences => self.active_convergences as f64,
            StatMetric::AvgSpread => self.avg_spread,
        }
    }

    /// Headline strings as the stat orbs render them
    pub fn display(&self) -> StatsDisplay {
        StatsDisplay {
            volume: format!("${:.0}M", self.total_volume),
            active_vectors: self.active_convergences.to_string(),
            avg_spread: format!("{:.1}%", self.avg_spread),
        }
    }
}

/// Formatted headline values
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsDisplay {
    pub volume: String,
    pub active_vectors: String,
    pub avg_spread: String,
}

/// Name of one headline scalar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatMetric {
    TotalVolume,
    ActiveConvergences,
    AvgSpread,
}

impl StatMetric {
    pub fn all() -> &'static [StatMetric] {
        &[
            StatMetric::TotalVolume,
            StatMetric::ActiveConvergences,
            StatMetric::AvgSpread,
        ]
    }

    /// Decimals shown for the animated value
    pub fn decimals(&self) -> usize {
        match self {
            StatMetric::TotalVolume => 0,
            StatMetric::ActiveConvergences => 0,
            StatMetric::AvgSpread => 1,
        }
    }
}

impl std::fmt::Display for StatMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatMetric::TotalVolume => write!(f, "total_volume"),
            StatMetric::ActiveConvergences => write!(f, "active_convergences"),
            StatMetric::AvgSpread => write!(f, "avg_spread"),
        }
    }
}

impl std::str::FromStr for StatMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total_volume" => Ok(StatMetric::TotalVolume),
            "active_convergences" => Ok(StatMetric::ActiveConvergences),
            "avg_spread" => Ok(StatMetric::AvgSpread),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}
