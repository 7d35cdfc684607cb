//! Bounded random walk for simulated latencies.

use rand::Rng;

/// Inclusive latency bounds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRange {
    pub min: f64,
    pub max: f64,
}

impl LatencyRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Node and service health latency bounds.
pub const NODE_LATENCY_RANGE: LatencyRange = LatencyRange::new(20.0, 150.0);
/// Bridge flow latency bounds.
pub const BRIDGE_FLOW_LATENCY_RANGE: LatencyRange = LatencyRange::new(30.0, 120.0);

/// Maximum per-call step for service health latency.
pub const NODE_LATENCY_STEP_MS: f64 = 10.0;
/// Maximum per-call step for bridge flow latency.
pub const BRIDGE_FLOW_STEP_MS: f64 = 7.5;

/// Apply one step of a bounded random walk.
///
/// The delta is drawn uniformly from `[-max_step, max_step]`; the result is
/// rounded to 0.1ms and always lies inside `range`.
pub fn step<R: Rng + ?Sized>(rng: &mut R, current: f64, max_step: f64, range: LatencyRange) -> f64 {
    let delta = if max_step > 0.0 {
        rng.gen_range(-max_step..=max_step)
    } else {
        0.0
    };
    let next = ((current + delta) * 10.0).round() / 10.0;
    range.clamp(next)
}
