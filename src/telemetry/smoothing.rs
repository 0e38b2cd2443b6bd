//! Smoothed display values
//!
//! A displayed number eases toward its target instead of jumping: every step
//! covers a fixed fraction of the remaining distance and snaps once the gap
//! falls under a tolerance.

use serde::Serialize;

/// Fraction of the remaining distance covered per step
pub const DEFAULT_FACTOR: f64 = 0.1;

/// Gap under which the value snaps to its target
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// A value decaying exponentially toward a (moving) target
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SmoothedValue {
    current: f64,
    target: f64,
    factor: f64,
    tolerance: f64,
}

impl SmoothedValue {
    /// Start settled at `initial`
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            factor: DEFAULT_FACTOR,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Builder method: set the step fraction, kept within (0, 1]
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    /// Builder method: set the snap tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Retarget; the decay continues from the current value
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one step and return the new displayed value
    pub fn step(&mut self) -> f64 {
        let diff = self.target - self.current;
        if diff.abs() < self.tolerance {
            self.current = self.target;
        } else {
            self.current += diff * self.factor;
        }
        self.current
    }

    /// Jump straight to the target
    pub fn settle(&mut self) {
        self.current = self.target;
    }
}
