//! Motion control algorithms.
//!
//! Every motion here is a blocking polling loop: sample a sensor, compare against a target, command
//! the drivetrain, wait, and repeat until the target is reached or a timeout elapses. Reaching the
//! timeout is a normal outcome, reported through an outcome enum so that autonomous routines can
//! carry on with a fallback plan. Sensor and motor failures abort the motion with a
//! [`MotionError`]. The motors are stopped on every exit path.

mod encoder;
mod navigate;
mod ramp;
mod turning;

#[cfg(test)]
mod sim;

pub use encoder::{DriveOutcome, EncoderDriving, EncoderGeometry};
pub use navigate::Navigator;
pub use ramp::stop_gradually;
pub use turning::{HeadingController, Polarity, Side, TurnMotion, TurnOutcome, TurnSettings};

use blueshift_tracking::SensorError;

/// Failure that aborts a motion.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MotionError<E: std::error::Error + 'static> {
    /// A sensor the motion depends on could not be read.
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// The drivetrain rejected a command.
    #[error("drivetrain command failed")]
    Drivetrain(#[source] E),
}
