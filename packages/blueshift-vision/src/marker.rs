use core::fmt;
use std::time::Duration;

use blueshift_control::Clock;
use blueshift_tracking::SensorError;

/// Pictograph column key read from a VuMark.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VuMark {
    /// Left column.
    Left,

    /// Center column.
    Center,

    /// Right column.
    Right,

    /// No mark is visible.
    #[default]
    Unknown,
}

impl fmt::Display for VuMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Unknown => "unknown",
        })
    }
}

/// An image recognition engine that can look for VuMarks.
pub trait MarkerSource {
    /// Starts tracking.
    fn activate(&mut self) -> Result<(), SensorError>;

    /// Stops tracking.
    fn deactivate(&mut self) -> Result<(), SensorError>;

    /// The mark currently in view, or [`VuMark::Unknown`] if none is.
    fn current_marker(&mut self) -> Result<VuMark, SensorError>;
}

/// Polls a [`MarkerSource`] until it recognizes a mark.
#[derive(Debug)]
pub struct MarkerTracker<S: MarkerSource> {
    source: S,

    /// Time between polls.
    pub poll_interval: Duration,
}

impl<S: MarkerSource> MarkerTracker<S> {
    /// Creates a tracker polling `source` every 10 milliseconds.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            poll_interval: Duration::from_millis(10),
        }
    }

    /// Activates tracking and waits up to `timeout` for a mark to come into view.
    ///
    /// Returns [`VuMark::Unknown`] if nothing was recognized in time. Tracking is deactivated
    /// before this returns, whatever the result.
    pub fn find_marker<C: Clock>(
        &mut self,
        clock: &mut C,
        timeout: Duration,
    ) -> Result<VuMark, SensorError> {
        self.source.activate()?;

        let found = self.poll(clock, timeout);
        let deactivated = self.source.deactivate();

        match (found, deactivated) {
            (Ok(mark), Ok(())) => Ok(mark),
            (Err(err), Ok(())) | (Ok(_), Err(err)) => Err(err),
            (Err(err), Err(cleanup)) => {
                log::warn!("Failed to deactivate marker tracking: {cleanup}");
                Err(err)
            }
        }
    }

    fn poll<C: Clock>(&mut self, clock: &mut C, timeout: Duration) -> Result<VuMark, SensorError> {
        let start_time = clock.now();

        loop {
            let mark = self.source.current_marker()?;

            if mark != VuMark::Unknown {
                log::info!("Found {mark} VuMark.");
                return Ok(mark);
            }

            if clock.since(start_time) >= timeout {
                log::warn!("No VuMark found within {timeout:?}.");
                return Ok(VuMark::Unknown);
            }

            clock.sleep(self.poll_interval);
        }
    }

    /// Returns a reference to the recognition engine.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the recognition engine.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
