//! Fixed-rate tick pacing for the headless runner.

use web_time::{Duration, Instant};

/// Paces ticks at a target rate and supplies the session clock that feeds
/// [`TickInput::time`](crate::rotation::TickInput::time).
///
/// A pacer that falls more than one interval behind drops the backlog
/// instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct TickPacer {
    interval: Duration,
    started: Instant,
    next_due: Instant,
    ticks: u64,
}

impl TickPacer {
    /// Pacer for `target_fps` ticks per second, starting now. 0 runs
    /// unpaced.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    /// Pacer with an explicit start instant.
    #[must_use]
    pub fn starting_at(target_fps: u32, started: Instant) -> Self {
        let interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(1_000_000_000 / u64::from(target_fps))
        };
        Self {
            interval,
            started,
            next_due: started,
            ticks: 0,
        }
    }

    /// Sleep until the next tick is due and return the tick's instant.
    pub fn wait(&mut self) -> Instant {
        let wait = self.schedule(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        Instant::now()
    }

    /// Book the next tick; returns how long to wait for it from `now`.
    fn schedule(&mut self, now: Instant) -> Duration {
        self.ticks += 1;
        let due = if now.saturating_duration_since(self.next_due)
            > self.interval
        {
            now
        } else {
            self.next_due
        };
        self.next_due = due + self.interval;
        due.saturating_duration_since(now)
    }

    /// Seconds since the pacer started.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64()
    }

    /// Ticks booked so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Average tick rate since the start.
    #[must_use]
    pub fn rate(&self, now: Instant) -> f64 {
        let elapsed = self.elapsed(now);
        if elapsed > 0.0 {
            self.ticks as f64 / elapsed
        } else {
            0.0
        }
    }
}
