//! Robot heading and orientation tracking.
//!
//! Motions read the robot's heading through the [`TracksHeading`] trait. The [`Gyroscope`]
//! wrapper implements it on top of any [`Imu`] driver, reporting headings relative to a reference
//! captured when the robot is zeroed.

mod gyro;

pub use gyro::{Gyroscope, Imu, Orientation};

use blueshift_math::Angle;

/// Failure to read a sensor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The hardware is not connected, not initialized, or not ready to report.
    #[error("sensor unavailable: {0}")]
    Unavailable(String),

    /// The hardware responded with a reading that cannot be used.
    #[error("invalid sensor reading: {0}")]
    InvalidReading(String),
}

/// A system that tracks its heading.
pub trait TracksHeading {
    /// Reads the current heading.
    ///
    /// Every call samples the live sensor; implementors must never return a stale value in place
    /// of a failed read.
    fn heading(&mut self) -> Result<Angle, SensorError>;
}

impl<T: TracksHeading + ?Sized> TracksHeading for &mut T {
    fn heading(&mut self) -> Result<Angle, SensorError> {
        (**self).heading()
    }
}
