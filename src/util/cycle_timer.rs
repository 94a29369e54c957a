//! Restarting cycle timer that feeds the scheduler's cycle position.
//!
//! Stands in for an upstream timer with a fixed length that restarts when
//! done: the position climbs from 0 towards 1 and wraps back to 0.

use web_time::{Duration, Instant};

/// Normalized position through a repeating fixed-length cycle.
#[derive(Debug, Clone)]
pub struct CycleTimer {
    period: Duration,
    started: Instant,
}

impl CycleTimer {
    /// Timer with the given cycle length, starting now.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    /// Timer with an explicit start instant.
    #[must_use]
    pub fn starting_at(period: Duration, started: Instant) -> Self {
        Self { period, started }
    }

    /// Position in `[0, 1)` at `now`. A zero-length cycle stays at 0.
    #[must_use]
    pub fn position(&self, now: Instant) -> f32 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let fraction = (elapsed / period).fract() as f32;
        // f64 -> f32 rounding can land exactly on 1.0
        if fraction >= 1.0 {
            0.0
        } else {
            fraction
        }
    }

    /// Number of completed cycles at `now`.
    #[must_use]
    pub fn completed_cycles(&self, now: Instant) -> u64 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / period).floor() as u64
    }
}
