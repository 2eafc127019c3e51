use std::time::{Duration, Instant};

/// Time source for polling loops.
///
/// Every blocking motion reads elapsed time and waits between samples through this trait, so that
/// the same loop can run against the wall clock on a robot or against simulated time in a test.
pub trait Clock {
    /// Time elapsed since this clock's epoch.
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);

    /// Time elapsed since `start`, a value previously returned by [`Clock::now`].
    fn since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

/// Wall-clock time, measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated time that only moves when slept on or advanced.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Moves time forward by `duration`.
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}
